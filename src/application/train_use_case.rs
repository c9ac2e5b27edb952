// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the training pipeline in order:
//
//   Step 1: Read + parse training records   (Layer 4 - data)
//   Step 2: Read + parse eval records       (Layer 4 - data)
//   Step 3: Persist the model config        (Layer 6 - infra)
//   Step 4: Open the summary log            (Layer 6 - infra)
//   Step 5: Run the training loop           (Layer 5 - ml)

use anyhow::Result;

use crate::application::factory::HarnessParams;
use crate::data::{dataset::DigitDataset, reader};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::model::DigitModelConfig;
use crate::ml::trainer::run_training;

/// The three directories one training run touches.
#[derive(Debug, Clone)]
pub struct TrainPaths {
    pub data_dir: String,
    pub eval_data_dir: String,
    pub checkpoint_dir: String,
}

pub struct TrainUseCase {
    paths: TrainPaths,
    model_cfg: DigitModelConfig,
    harness: HarnessParams,
}

impl TrainUseCase {
    pub fn new(paths: TrainPaths, model_cfg: DigitModelConfig, harness: HarnessParams) -> Self {
        Self { paths, model_cfg, harness }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        // ── Step 1: Training records ──────────────────────────────────────────
        tracing::info!("Reading training records from '{}'", self.paths.data_dir);
        let train_examples = reader::read_examples(&self.paths.data_dir)?;
        let train_dataset = DigitDataset::new(train_examples);

        // ── Step 2: Eval records, capped at eval_set_size ─────────────────────
        tracing::info!("Reading eval records from '{}'", self.paths.eval_data_dir);
        let eval_examples = reader::read_examples(&self.paths.eval_data_dir)?;
        let eval_dataset =
            DigitDataset::new(eval_examples).truncated(self.harness.eval_set_size);
        tracing::info!(
            "Datasets ready: {} train, {} eval",
            train_dataset.sample_count(),
            eval_dataset.sample_count(),
        );

        // ── Step 3: Persist the architecture before training starts ───────────
        let ckpt = CheckpointManager::new(&self.paths.checkpoint_dir);
        ckpt.save_config(&self.model_cfg)?;

        // ── Step 4: Summary side-channel for external monitoring ──────────────
        let summary = MetricsLogger::new(&self.paths.checkpoint_dir)?;
        tracing::info!("Summary log at '{}'", summary.csv_path().display());

        // ── Step 5: Train until max_steps ─────────────────────────────────────
        run_training(
            &self.model_cfg,
            &self.harness,
            train_dataset,
            eval_dataset,
            ckpt,
            summary,
        )
    }
}
