// ============================================================
// Layer 6 — Metrics
// ============================================================
// Three small pieces:
//
//   StreamingMean      — a running average with the update/value
//                        operations split, so the caller can fold
//                        in many small batches and read one stable
//                        cumulative number instead of a single
//                        batch-noisy value.
//
//   format helpers     — fixed-precision strings for log lines
//                        and batch-prediction CSV rows.
//
//   MetricsLogger      — the summary side-channel: one CSV row
//                        per evaluation cycle (step, loss,
//                        accuracy) for external monitoring and
//                        plotting. Passed explicitly to whoever
//                        needs it; there is no process-global
//                        summary registry.
//
// Output files: <dir>/metrics.csv (training curve) and
// <dir>/eval_metrics.csv (standalone eval runs), kept separate
// so eval rows at step 0 never land inside the training curve.
//
//   step,loss,accuracy
//   500,0.412387,0.881200
//   1000,0.305114,0.912400

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

// ─── StreamingMean ────────────────────────────────────────────────────────────

/// Running mean maintained incrementally across repeated batches.
#[derive(Debug, Default, Clone)]
pub struct StreamingMean {
    sum: f64,
    count: usize,
}

impl StreamingMean {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the running average.
    pub fn update(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Read the running average. An empty mean reads as 0.0.
    pub fn value(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

// ─── Formatting helpers ───────────────────────────────────────────────────────

/// Format a (loss, accuracy) pair for log lines.
pub fn format_metric_values(loss: f64, accuracy: f64) -> String {
    format!("loss: {loss:.3}, accuracy: {accuracy:.3}")
}

/// Format one prediction score for batch-prediction CSV output.
/// Mirrors the metric formatting: first value, 3 decimal places.
pub fn format_prediction_values(scores: &[f32]) -> String {
    match scores.first() {
        Some(score) => format!("{score:.3}"),
        None => String::new(),
    }
}

// ─── MetricsLogger ────────────────────────────────────────────────────────────

/// Appends one `step,loss,accuracy` row per evaluation cycle.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Logger for the training curve: `<dir>/metrics.csv`.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        Self::with_file(dir, "metrics.csv")
    }

    /// Logger for standalone eval runs: `<dir>/eval_metrics.csv`.
    /// Kept apart from the training curve.
    pub fn eval(dir: impl Into<String>) -> Result<Self> {
        Self::with_file(dir, "eval_metrics.csv")
    }

    /// Writes the CSV header if the file is new so repeated runs
    /// append rather than overwrite.
    fn with_file(dir: impl Into<String>, file_name: &str) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join(file_name);
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "step,loss,accuracy")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one summary row.
    pub fn log(&self, step: u64, loss: f64, accuracy: f64) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(f, "{step},{loss:.6},{accuracy:.6}")?;

        tracing::debug!(
            "Logged summary at step {}: loss={:.4}, accuracy={:.4}",
            step,
            loss,
            accuracy,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
