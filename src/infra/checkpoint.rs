// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved per checkpoint:
//   1. Model weights (.mpk.gz file) — all learned parameters
//   2. latest_step.json             — global step of the last save
//   3. model_config.json            — model architecture config
//
// The config is saved separately because eval and predict must
// rebuild the exact architecture (hidden widths) before the
// weights can be loaded into it; CompactRecorder refuses to load
// into a mismatched module.
//
// File naming convention:
//   checkpoints/
//     model_step_500.mpk.gz   ← weights at global step 500
//     model_step_1000.mpk.gz
//     ...
//     latest_step.json        ← contains the latest saved step
//     model_config.json       ← model hyperparameters

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::backend::{AutodiffBackend, Backend},
};
use std::{fs, path::PathBuf};

use crate::ml::model::{DigitModel, DigitModelConfig};

/// Manages saving and loading of model checkpoints.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory
    /// if it does not already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save model weights at the given global step and update the
    /// latest-step pointer.
    pub fn save_model<B: AutodiffBackend>(
        &self,
        model: &DigitModel<B>,
        step: u64,
    ) -> Result<()> {
        // Recorder appends its own extension to the path
        let path = self.dir.join(format!("model_step_{step}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        let latest_path = self.dir.join("latest_step.json");
        fs::write(&latest_path, serde_json::to_string(&step)?)
            .with_context(|| "Failed to write latest_step.json")?;

        tracing::debug!("Saved checkpoint at step {}", step);
        Ok(())
    }

    /// Load model weights from the latest saved checkpoint.
    /// The model argument must already have the architecture the
    /// checkpoint was saved with (rebuild it from `load_config`).
    pub fn load_model<B: Backend>(
        &self,
        model: DigitModel<B>,
        device: &B::Device,
    ) -> Result<DigitModel<B>> {
        let step = self.latest_step()?;
        let path = self.dir.join(format!("model_step_{step}"));

        tracing::info!("Loading checkpoint from step {}", step);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display()
                )
            })?;

        Ok(model.load_record(record))
    }

    /// Persist the model architecture config. Must happen before
    /// training starts so eval/predict can rebuild the model even
    /// if the run is interrupted.
    pub fn save_config(&self, cfg: &DigitModelConfig) -> Result<()> {
        let path = self.dir.join("model_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved model config to '{}'", path.display());
        Ok(())
    }

    /// Load the persisted model architecture config.
    pub fn load_config(&self) -> Result<DigitModelConfig> {
        let path = self.dir.join("model_config.json");

        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Make sure you have run 'train' first.",
                path.display()
            )
        })?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Read latest_step.json and return the step number.
    fn latest_step(&self) -> Result<u64> {
        let path = self.dir.join("latest_step.json");

        let s = fs::read_to_string(&path)
            .with_context(|| "Cannot find 'latest_step.json'. Have you run 'train' first?")?;

        Ok(serde_json::from_str::<u64>(&s)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::IMAGE_PIXELS;
    use crate::ml::{default_device, InferBackend, TrainBackend};
    use burn::module::AutodiffModule;
    use burn::tensor::Tensor;

    fn temp_checkpoint_dir() -> PathBuf {
        std::env::temp_dir().join(format!("digit_ckpt_test_{}", std::process::id()))
    }

    #[test]
    fn test_save_and_load_roundtrip_preserves_weights() {
        let dir = temp_checkpoint_dir();
        let ckpt = CheckpointManager::new(dir.to_string_lossy().to_string());

        let device = default_device();
        let cfg = DigitModelConfig::new(0.01).with_hidden1(4).with_hidden2(4);
        let trained: DigitModel<TrainBackend> = cfg.init(&device);

        ckpt.save_config(&cfg).unwrap();
        ckpt.save_model(&trained, 7).unwrap();

        let restored_cfg = ckpt.load_config().unwrap();
        let fresh: DigitModel<InferBackend> = restored_cfg.init(&device);
        let restored = ckpt.load_model(fresh, &device).unwrap();

        let input = Tensor::<InferBackend, 2>::ones([1, IMAGE_PIXELS], &device);
        let expected: Vec<f32> = trained
            .valid()
            .forward(input.clone())
            .into_data()
            .convert::<f32>()
            .value;
        let actual: Vec<f32> = restored.forward(input).into_data().convert::<f32>().value;

        assert_eq!(expected.len(), actual.len());
        for (e, a) in expected.iter().zip(actual.iter()) {
            assert!((e - a).abs() < 1e-6);
        }

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_without_checkpoint_is_an_error() {
        let dir = std::env::temp_dir().join(format!("digit_ckpt_empty_{}", std::process::id()));
        let ckpt = CheckpointManager::new(dir.to_string_lossy().to_string());

        let device = default_device();
        let model: DigitModel<InferBackend> =
            DigitModelConfig::new(0.01).with_hidden1(2).with_hidden2(2).init(&device);

        assert!(ckpt.load_model(model, &device).is_err());
        fs::remove_dir_all(&dir).ok();
    }
}
