// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// The serving/export workflow:
//
//   1. Rebuild the model from the persisted config and load the
//      latest checkpoint
//   2. Register the serving signature (named input/output
//      endpoints) in the export directory
//   3. If an input file was given, run batch prediction over it
//      and write one CSV row per record
//
// The prediction pipeline accepts whatever batch size the input
// file provides; there is no fixed batch dimension.

use anyhow::Result;
use std::{fs, io::Write, path::PathBuf};

use crate::data::{batcher::batch_prediction, reader};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::export::ServingSignature;
use crate::infra::metrics::format_prediction_values;
use crate::ml::model::DigitModel;
use crate::ml::predictor::predict;
use crate::ml::{default_device, InferBackend};

pub struct PredictUseCase {
    checkpoint_dir: String,
    export_dir: String,
    input: Option<String>,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: String, export_dir: String, input: Option<String>) -> Self {
        Self { checkpoint_dir, export_dir, input }
    }

    pub fn execute(&self) -> Result<()> {
        let device = default_device();
        let ckpt = CheckpointManager::new(&self.checkpoint_dir);
        let model_cfg = ckpt.load_config()?;
        let model: DigitModel<InferBackend> = model_cfg.init(&device);
        let model = ckpt.load_model(model, &device)?;

        // The contract the serving harness reads: which endpoints to
        // feed and fetch, and which are base64 over HTTP.
        ServingSignature::digit_classifier().write(&self.export_dir)?;

        let Some(input) = &self.input else {
            tracing::info!("No prediction input given; exported signature only");
            return Ok(());
        };

        let requests = reader::read_prediction_records(input)?;
        if requests.is_empty() {
            tracing::warn!("Prediction input '{}' holds no records", input);
            return Ok(());
        }

        let batch = batch_prediction::<InferBackend>(&requests, &device);
        let predictions = predict(&model, &batch);

        let csv_path = self.write_csv(&predictions)?;
        tracing::info!(
            "Wrote {} predictions to '{}'",
            predictions.len(),
            csv_path.display(),
        );
        Ok(())
    }

    /// One row per record: echoed key, predicted class, formatted
    /// confidence score.
    fn write_csv(&self, predictions: &[crate::ml::predictor::Prediction]) -> Result<PathBuf> {
        let path = PathBuf::from(&self.export_dir).join("predictions.csv");
        let mut f = fs::File::create(&path)?;

        writeln!(f, "key,prediction,score")?;
        for p in predictions {
            writeln!(
                f,
                "{},{},{}",
                p.key,
                p.class,
                format_prediction_values(&[p.confidence()]),
            )?;
        }
        Ok(path)
    }
}
