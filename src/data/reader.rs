// ============================================================
// Layer 4 — Record Reader
// ============================================================
// Reads serialized example records from disk: every *.jsonl
// file in the data directory contributes one record per
// non-empty line. A file that cannot be read is skipped with
// a warning; a record that fails validation is fatal (there is
// no sensible way to train on a half-parsed batch).

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::domain::record::{
    parse_examples, parse_prediction_records, DigitExample, PredictRequest,
};

/// Read and parse all training/eval records under `dir`.
pub fn read_examples(dir: impl AsRef<Path>) -> Result<Vec<DigitExample>> {
    let records = collect_lines(dir.as_ref())?;
    let examples = parse_examples(&records)?;

    let unlabelled = examples.iter().filter(|e| !e.is_labelled()).count();
    if unlabelled > 0 {
        // The loss will reject these; flag them at read time
        tracing::warn!("{} of {} records carry no valid label", unlabelled, examples.len());
    }

    tracing::info!("Parsed {} example records", examples.len());
    Ok(examples)
}

/// Read and parse prediction requests from a single JSONL file.
pub fn read_prediction_records(path: impl AsRef<Path>) -> Result<Vec<PredictRequest>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read prediction input '{}'", path.display()))?;

    let records: Vec<String> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.to_string())
        .collect();

    let requests = parse_prediction_records(&records)?;
    tracing::info!("Parsed {} prediction records", requests.len());
    Ok(requests)
}

/// Collect one serialized record per non-empty line across all
/// .jsonl files in the directory.
fn collect_lines(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        anyhow::bail!("Data directory '{}' does not exist", dir.display());
    }

    let mut records = Vec::new();
    let mut files = 0usize;

    for entry in
        fs::read_dir(dir).with_context(|| format!("Cannot read directory '{}'", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            continue;
        }

        match fs::read_to_string(&path) {
            Ok(content) => {
                files += 1;
                records.extend(
                    content
                        .lines()
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| l.to_string()),
                );
            }
            Err(e) => {
                tracing::warn!("Skipping '{}': {}", path.display(), e);
            }
        }
    }

    tracing::info!(
        "Collected {} records from {} files in '{}'",
        records.len(),
        files,
        dir.display()
    );
    Ok(records)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::IMAGE_PIXELS;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mnist-trainer-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_reads_jsonl_lines_and_skips_other_files() {
        let dir = scratch_dir("reader");
        let record = serde_json::json!({
            "images": vec![0.0f32; IMAGE_PIXELS],
            "labels": 4,
        });

        fs::write(
            dir.join("shard-0.jsonl"),
            format!("{record}\n\n{record}\n"),
        )
        .unwrap();
        fs::write(dir.join("notes.txt"), "not a record").unwrap();

        let examples = read_examples(&dir).unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].labels, 4);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = std::env::temp_dir().join("mnist-trainer-does-not-exist");
        assert!(read_examples(&dir).is_err());
    }
}
