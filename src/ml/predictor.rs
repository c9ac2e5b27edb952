// ============================================================
// Layer 5 — Predictor
// ============================================================
// The serving-side pipeline: inference → softmax → argmax.
// Takes a dynamically-sized batch and returns, per record, the
// echoed key, the predicted class index and the full softmax
// score vector — the three output endpoints registered in the
// serving signature (Layer 6).

use burn::tensor::{activation::softmax, backend::Backend};

use crate::data::batcher::PredictBatch;
use crate::domain::record::NUM_CLASSES;
use crate::ml::model::DigitModel;

/// One prediction: echoed key, argmax class, softmax scores.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub key: String,
    pub class: i64,
    pub scores: Vec<f32>,
}

impl Prediction {
    /// The softmax probability of the predicted class.
    pub fn confidence(&self) -> f32 {
        self.scores.get(self.class as usize).copied().unwrap_or(0.0)
    }
}

/// Run the prediction pipeline over one batch.
pub fn predict<B: Backend>(model: &DigitModel<B>, batch: &PredictBatch<B>) -> Vec<Prediction> {
    let logits = model.forward(batch.images.clone());
    let probabilities = softmax(logits, 1);

    let classes: Vec<i64> = probabilities
        .clone()
        .argmax(1)
        .flatten::<1>(0, 1)
        .into_data()
        .convert::<i64>()
        .value;

    let scores: Vec<f32> = probabilities.into_data().convert::<f32>().value;

    batch
        .keys
        .iter()
        .zip(classes)
        .zip(scores.chunks(NUM_CLASSES))
        .map(|((key, class), row)| Prediction {
            key: key.clone(),
            class,
            scores: row.to_vec(),
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batcher::batch_prediction;
    use crate::domain::record::{PredictRequest, IMAGE_PIXELS};
    use crate::ml::model::DigitModelConfig;
    use crate::ml::{default_device, InferBackend};

    #[test]
    fn test_predictions_echo_keys_and_normalize_scores() {
        let device = default_device();
        let model = DigitModelConfig::new(0.01)
            .with_hidden1(4)
            .with_hidden2(4)
            .init::<InferBackend>(&device);

        let requests = vec![
            PredictRequest { image: vec![0.2; IMAGE_PIXELS], key: "first".into() },
            PredictRequest { image: vec![0.8; IMAGE_PIXELS], key: "second".into() },
        ];
        let batch = batch_prediction::<InferBackend>(&requests, &device);

        let predictions = predict(&model, &batch);
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].key, "first");
        assert_eq!(predictions[1].key, "second");

        for p in &predictions {
            assert!((0..NUM_CLASSES as i64).contains(&p.class));
            assert_eq!(p.scores.len(), NUM_CLASSES);

            let sum: f32 = p.scores.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4);

            // The argmax class carries the highest score
            let max = p.scores.iter().cloned().fold(f32::MIN, f32::max);
            assert_eq!(p.confidence(), max);
        }
    }
}
