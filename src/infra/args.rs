// ============================================================
// Layer 6 — Argument Merging
// ============================================================
// The training harness owns most hyperparameter flags; the
// model factory only injects defaults for the ones it cares
// about. The merge policy is non-destructive: a default is
// appended only when the flag is absent, in either the
// `--flag value` or the `--flag=value` spelling.

use anyhow::{Context, Result};
use std::str::FromStr;

/// True when `args` already contains `flag` in either spelling.
fn contains_flag(flag: &str, args: &[String]) -> bool {
    let prefixed = format!("{flag}=");
    args.iter().any(|a| a == flag || a.starts_with(&prefixed))
}

/// Append `flag value` to `args` unless the flag is already present.
/// Explicit caller values always win; defaults only fill gaps.
pub fn override_if_not_in_args(flag: &str, value: &str, args: &mut Vec<String>) {
    if !contains_flag(flag, args) {
        args.push(flag.to_string());
        args.push(value.to_string());
        tracing::debug!("Injected default {} {}", flag, value);
    }
}

/// Read the value of `flag` out of `args` without removing it.
/// Returns None when the flag is absent.
pub fn flag_value(flag: &str, args: &[String]) -> Option<String> {
    let prefixed = format!("{flag}=");

    for (idx, arg) in args.iter().enumerate() {
        if arg == flag {
            // `--flag value` — value is the next token
            return args.get(idx + 1).cloned();
        }
        if let Some(value) = arg.strip_prefix(&prefixed) {
            // `--flag=value`
            return Some(value.to_string());
        }
    }
    None
}

/// Parse the value of `flag` into `T`. Absent flag → Ok(None);
/// present but unparseable → error (aborts the run, matching the
/// fail-fast behaviour of standard argument parsing).
pub fn parse_flag<T>(flag: &str, args: &[String]) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match flag_value(flag, args) {
        None => Ok(None),
        Some(raw) => {
            let parsed = raw
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("Invalid value '{raw}' for {flag}: {e}"))?;
            Ok(Some(parsed))
        }
    }
}

/// Remove `flag` (and its value) from `args`, returning the parsed
/// value if it was present. Used by the model factory to consume
/// its own flags and hand the residual list to the harness.
pub fn take_flag<T>(flag: &str, args: &mut Vec<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = parse_flag::<T>(flag, args)?;

    if parsed.is_some() {
        let prefixed = format!("{flag}=");
        if let Some(idx) = args.iter().position(|a| a == flag) {
            // Remove the flag and its value token
            args.remove(idx);
            if idx < args.len() {
                args.remove(idx);
            }
        } else if let Some(idx) = args.iter().position(|a| a.starts_with(&prefixed)) {
            args.remove(idx);
        }
    }
    Ok(parsed)
}

/// Parse a flag that is guaranteed to be present (because a default
/// was injected earlier). Missing flag is a programming error and
/// reported as such.
pub fn required_flag<T>(flag: &str, args: &[String]) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_flag::<T>(flag, args)?
        .with_context(|| format!("Missing required flag {flag} after default injection"))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_existing_value_wins_over_default() {
        // Caller passed --batch_size=50; the injected default 100
        // must leave 50 in effect.
        let mut a = args(&["--batch_size=50"]);
        override_if_not_in_args("--batch_size", "100", &mut a);

        assert_eq!(a, args(&["--batch_size=50"]));
        assert_eq!(parse_flag::<usize>("--batch_size", &a).unwrap(), Some(50));
    }

    #[test]
    fn test_existing_two_token_value_wins() {
        let mut a = args(&["--batch_size", "50"]);
        override_if_not_in_args("--batch_size", "100", &mut a);
        assert_eq!(parse_flag::<usize>("--batch_size", &a).unwrap(), Some(50));
    }

    #[test]
    fn test_default_fills_missing_flag() {
        let mut a = args(&["--max_steps", "200"]);
        override_if_not_in_args("--batch_size", "100", &mut a);

        assert_eq!(parse_flag::<usize>("--batch_size", &a).unwrap(), Some(100));
        assert_eq!(parse_flag::<usize>("--max_steps", &a).unwrap(), Some(200));
    }

    #[test]
    fn test_take_flag_removes_both_spellings() {
        let mut a = args(&["--learning_rate", "0.05", "--max_steps", "10"]);
        let lr = take_flag::<f64>("--learning_rate", &mut a).unwrap();
        assert_eq!(lr, Some(0.05));
        assert_eq!(a, args(&["--max_steps", "10"]));

        let mut a = args(&["--learning_rate=0.2"]);
        let lr = take_flag::<f64>("--learning_rate", &mut a).unwrap();
        assert_eq!(lr, Some(0.2));
        assert!(a.is_empty());
    }

    #[test]
    fn test_invalid_float_is_an_error() {
        let a = args(&["--learning_rate", "fast"]);
        assert!(parse_flag::<f64>("--learning_rate", &a).is_err());
    }
}
