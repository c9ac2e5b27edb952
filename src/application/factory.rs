// ============================================================
// Layer 2 — Model Factory
// ============================================================
// The factory owns exactly one flag, --learning_rate; everything
// else in the override list belongs to the harness. It consumes
// its flag, injects defaults for the six harness hyperparameters
// (only where absent — explicit caller values always win) and
// returns the configured model plus the residual argument list.

use anyhow::Result;

use crate::infra::args::{override_if_not_in_args, required_flag, take_flag};
use crate::ml::model::DigitModelConfig;

const DEFAULT_LEARNING_RATE: f64 = 0.01;

/// Harness defaults injected when the caller did not set them.
const HARNESS_DEFAULTS: &[(&str, &str)] = &[
    ("--max_steps", "5000"),
    ("--batch_size", "100"),
    ("--eval_set_size", "10000"),
    ("--eval_interval_secs", "1"),
    ("--log_interval_secs", "1"),
    ("--min_train_eval_rate", "1"),
];

/// Parse --learning_rate out of `args`, inject the harness
/// defaults, and return the configured model together with the
/// residual (harness-owned) arguments.
pub fn create_model(args: &[String]) -> Result<(DigitModelConfig, Vec<String>)> {
    let mut task_args = args.to_vec();

    let learning_rate =
        take_flag::<f64>("--learning_rate", &mut task_args)?.unwrap_or(DEFAULT_LEARNING_RATE);

    for (flag, value) in HARNESS_DEFAULTS {
        override_if_not_in_args(flag, value, &mut task_args);
    }

    Ok((DigitModelConfig::new(learning_rate), task_args))
}

/// The six harness-level hyperparameters, read back out of the
/// merged argument list. All are guaranteed present after
/// `create_model` ran its default injection.
#[derive(Debug, Clone)]
pub struct HarnessParams {
    /// Stop training once global_step reaches this
    pub max_steps: u64,

    /// Examples per optimizer step / eval batch
    pub batch_size: usize,

    /// Cap on the number of eval examples per cycle
    pub eval_set_size: usize,

    /// Minimum seconds between evaluation cycles
    pub eval_interval_secs: u64,

    /// Minimum seconds between training log lines
    pub log_interval_secs: u64,

    /// Minimum training steps between evaluation cycles
    pub min_train_eval_rate: u64,
}

impl HarnessParams {
    pub fn from_args(args: &[String]) -> Result<Self> {
        Ok(Self {
            max_steps: required_flag("--max_steps", args)?,
            batch_size: required_flag("--batch_size", args)?,
            eval_set_size: required_flag("--eval_set_size", args)?,
            eval_interval_secs: required_flag("--eval_interval_secs", args)?,
            log_interval_secs: required_flag("--log_interval_secs", args)?,
            min_train_eval_rate: required_flag("--min_train_eval_rate", args)?,
        })
    }
}
