// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Step-driven training pipeline on Burn's DataLoader and SGD:
//
//   - the shuffled loader is re-iterated indefinitely; the stop
//     condition is the global step counter, never the epoch
//   - every optimizer update increments global_step by exactly 1;
//     that counter is the authoritative progress indicator for
//     stopping, logging and evaluation-interval decisions
//   - loss and accuracy are folded into streaming means so the
//     log lines show stable cumulative values, not single-batch
//     noise
//   - each evaluation cycle writes a summary row (the "loss" /
//     "accuracy" scalars) and a checkpoint
//
// Gradient computation, the SGD update itself and the worker
// threads all belong to Burn.

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer, SgdConfig},
    tensor::{backend::AutodiffBackend, ElementConversion},
};
use std::time::{Duration, Instant};

use crate::application::factory::HarnessParams;
use crate::data::{batcher::DigitBatch, batcher::DigitBatcher, dataset::DigitDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{format_metric_values, MetricsLogger, StreamingMean};
use crate::ml::evaluator::run_evaluation;
use crate::ml::model::{evaluation, loss, DigitModel, DigitModelConfig};
use crate::ml::{default_device, InferBackend, TrainBackend};

/// Fixed shuffle seed so interrupted runs see the same order.
const SHUFFLE_SEED: u64 = 42;

/// Loss and accuracy of a single optimizer step.
pub struct StepMetrics {
    pub loss: f64,
    pub accuracy: f64,
}

/// One SGD update: forward → loss → backward → parameter update,
/// then the global step counter advances by exactly 1. The counter
/// moves regardless of the loss value — a zero-gradient plateau
/// still counts as a completed step.
pub fn train_step<B, O>(
    model: DigitModel<B>,
    batch: &DigitBatch<B>,
    optim: &mut O,
    learning_rate: f64,
    global_step: &mut u64,
) -> Result<(DigitModel<B>, StepMetrics)>
where
    B: AutodiffBackend,
    O: Optimizer<DigitModel<B>, B>,
{
    let logits = model.forward(batch.images.clone());
    let accuracy = evaluation(logits.clone(), batch.labels.clone());

    let loss_tensor = loss(logits, batch.labels.clone())?;
    let loss_value: f64 = loss_tensor.clone().into_scalar().elem::<f64>();

    let grads = GradientsParams::from_grads(loss_tensor.backward(), &model);
    let model = optim.step(learning_rate, model, grads);

    *global_step += 1;

    Ok((model, StepMetrics { loss: loss_value, accuracy }))
}

/// Run the full training pipeline until `max_steps`.
pub fn run_training(
    model_cfg: &DigitModelConfig,
    harness: &HarnessParams,
    train_dataset: DigitDataset,
    eval_dataset: DigitDataset,
    ckpt: CheckpointManager,
    summary: MetricsLogger,
) -> Result<()> {
    if train_dataset.sample_count() == 0 {
        anyhow::bail!("Training dataset is empty");
    }

    let device = default_device();
    let mut model: DigitModel<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: 784 → {} → {} → 10, learning_rate={}",
        model_cfg.hidden1,
        model_cfg.hidden2,
        model_cfg.learning_rate,
    );

    // Plain gradient descent at the fixed learning rate
    let mut optim = SgdConfig::new().init();

    // Training loader: shuffled, re-iterated indefinitely below
    let train_batcher = DigitBatcher::<TrainBackend>::new(device.clone());
    let train_loader = DataLoaderBuilder::new(train_batcher)
        .batch_size(harness.batch_size)
        .shuffle(SHUFFLE_SEED)
        .num_workers(1)
        .build(train_dataset);

    // Eval loader: unshuffled, on the inner backend
    let eval_batcher = DigitBatcher::<InferBackend>::new(device.clone());
    let eval_loader = DataLoaderBuilder::new(eval_batcher)
        .batch_size(harness.batch_size)
        .num_workers(1)
        .build(eval_dataset);

    let mut global_step: u64 = 0;
    let mut loss_mean = StreamingMean::new();
    let mut accuracy_mean = StreamingMean::new();

    let log_interval = Duration::from_secs(harness.log_interval_secs);
    let eval_interval = Duration::from_secs(harness.eval_interval_secs);
    let mut last_log = Instant::now();
    let mut last_eval = Instant::now();
    let mut steps_since_eval: u64 = 0;

    'training: loop {
        for batch in train_loader.iter() {
            let (next_model, metrics) = train_step(
                model,
                &batch,
                &mut optim,
                model_cfg.learning_rate,
                &mut global_step,
            )?;
            model = next_model;
            steps_since_eval += 1;

            loss_mean.update(metrics.loss);
            accuracy_mean.update(metrics.accuracy);

            if last_log.elapsed() >= log_interval {
                tracing::info!(
                    "step {}: {}",
                    global_step,
                    format_metric_values(loss_mean.value(), accuracy_mean.value()),
                );
                last_log = Instant::now();
            }

            // Evaluate only after enough training progress, so slow
            // eval cycles cannot starve training.
            if last_eval.elapsed() >= eval_interval
                && steps_since_eval >= harness.min_train_eval_rate
            {
                evaluate_and_checkpoint(&model, &*eval_loader, global_step, &ckpt, &summary)?;
                last_eval = Instant::now();
                steps_since_eval = 0;
            }

            if global_step >= harness.max_steps {
                break 'training;
            }
        }
    }

    // Final eval + checkpoint at the last step
    evaluate_and_checkpoint(&model, &*eval_loader, global_step, &ckpt, &summary)?;

    tracing::info!(
        "Training complete at step {} ({} steps averaged): {}",
        global_step,
        loss_mean.count(),
        format_metric_values(loss_mean.value(), accuracy_mean.value()),
    );
    Ok(())
}

fn evaluate_and_checkpoint(
    model: &DigitModel<TrainBackend>,
    eval_loader: &dyn burn::data::dataloader::DataLoader<DigitBatch<InferBackend>>,
    global_step: u64,
    ckpt: &CheckpointManager,
    summary: &MetricsLogger,
) -> Result<()> {
    // model.valid() drops the autodiff graph for evaluation
    let report = run_evaluation(&model.valid(), eval_loader, 1)?;

    println!(
        "step {:>6} | eval over {} examples | {}",
        global_step,
        report.examples,
        format_metric_values(report.loss, report.accuracy),
    );

    summary.log(global_step, report.loss, report.accuracy)?;
    ckpt.save_model(model, global_step)?;
    Ok(())
}
