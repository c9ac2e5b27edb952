// ============================================================
// Layer 5 — Evaluation Loop
// ============================================================
// The eval pipeline has no optimizer and no trainable step
// counter: it folds per-batch loss and accuracy into streaming
// means across a fixed number of passes over the eval set, so
// the reported numbers are cumulative rather than batch-noisy.

use anyhow::Result;
use burn::data::dataloader::DataLoader;
use burn::tensor::{backend::Backend, ElementConversion};

use crate::data::batcher::DigitBatch;
use crate::infra::metrics::StreamingMean;
use crate::ml::model::{evaluation, loss, DigitModel};

/// Cumulative metrics of one evaluation run.
pub struct EvalReport {
    pub loss: f64,
    pub accuracy: f64,
    pub examples: usize,
}

/// Run `passes` full passes over the eval loader and return the
/// streaming means of loss and accuracy.
pub fn run_evaluation<B: Backend>(
    model: &DigitModel<B>,
    loader: &dyn DataLoader<DigitBatch<B>>,
    passes: usize,
) -> Result<EvalReport> {
    let mut loss_mean = StreamingMean::new();
    let mut accuracy_mean = StreamingMean::new();
    let mut examples = 0usize;

    for _ in 0..passes {
        for batch in loader.iter() {
            let logits = model.forward(batch.images.clone());

            let batch_loss: f64 = loss(logits.clone(), batch.labels.clone())?
                .into_scalar()
                .elem::<f64>();

            loss_mean.update(batch_loss);
            accuracy_mean.update(evaluation(logits, batch.labels.clone()));
            examples += batch.labels.dims()[0];
        }
    }

    Ok(EvalReport {
        loss: loss_mean.value(),
        accuracy: accuracy_mean.value(),
        examples,
    })
}
