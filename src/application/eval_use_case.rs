// ============================================================
// Layer 2 — EvalUseCase
// ============================================================
// Standalone evaluation of a trained checkpoint. Unlike the
// training pipeline this one carries no optimizer and a
// zero-initialized step counter: the eval loader runs exactly
// two unshuffled passes over the (capped) eval set and the
// streaming means accumulate across both.

use anyhow::Result;
use burn::data::dataloader::DataLoaderBuilder;

use crate::application::factory::HarnessParams;
use crate::data::{batcher::DigitBatcher, dataset::DigitDataset, reader};
use crate::infra::{checkpoint::CheckpointManager, metrics::format_metric_values, metrics::MetricsLogger};
use crate::ml::evaluator::run_evaluation;
use crate::ml::model::DigitModel;
use crate::ml::{default_device, InferBackend};

/// Eval mode reads the eval set twice.
const EVAL_PASSES: usize = 2;

pub struct EvalUseCase {
    data_dir: String,
    checkpoint_dir: String,
    harness: HarnessParams,
}

impl EvalUseCase {
    pub fn new(data_dir: String, checkpoint_dir: String, harness: HarnessParams) -> Self {
        Self { data_dir, checkpoint_dir, harness }
    }

    /// Load the checkpoint, run the eval pipeline, report metrics.
    pub fn execute(&self) -> Result<()> {
        // Rebuild the exact trained architecture, then load weights
        let device = default_device();
        let ckpt = CheckpointManager::new(&self.checkpoint_dir);
        let model_cfg = ckpt.load_config()?;
        let model: DigitModel<InferBackend> = model_cfg.init(&device);
        let model = ckpt.load_model(model, &device)?;

        let examples = reader::read_examples(&self.data_dir)?;
        let dataset = DigitDataset::new(examples).truncated(self.harness.eval_set_size);
        tracing::info!("Evaluating on {} examples", dataset.sample_count());

        // Unshuffled loader — eval order must be deterministic
        let loader = DataLoaderBuilder::new(DigitBatcher::<InferBackend>::new(device))
            .batch_size(self.harness.batch_size)
            .num_workers(1)
            .build(dataset);

        let report = run_evaluation(&model, &*loader, EVAL_PASSES)?;

        // No training happened here: the step counter stays at 0,
        // and the row goes to the eval file, not the training curve
        let summary = MetricsLogger::eval(&self.checkpoint_dir)?;
        summary.log(0, report.loss, report.accuracy)?;

        println!(
            "eval over {} examples | {}",
            report.examples,
            format_metric_values(report.loss, report.accuracy),
        );
        Ok(())
    }
}
