use anyhow::{bail, Result};
use burn::{
    nn::{loss::CrossEntropyLossConfig, Linear, LinearConfig},
    prelude::*,
    tensor::{activation::relu, ElementConversion},
};

use crate::domain::record::{IMAGE_PIXELS, NUM_CLASSES};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct DigitModelConfig {
    /// Fixed SGD learning rate
    pub learning_rate: f64,

    /// Width of the first hidden layer
    #[config(default = 128)]
    pub hidden1: usize,

    /// Width of the second hidden layer
    #[config(default = 32)]
    pub hidden2: usize,
}

impl DigitModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> DigitModel<B> {
        DigitModel {
            fc1: LinearConfig::new(IMAGE_PIXELS, self.hidden1).init(device),
            fc2: LinearConfig::new(self.hidden1, self.hidden2).init(device),
            output: LinearConfig::new(self.hidden2, NUM_CLASSES).init(device),
        }
    }
}

/// Fully connected digit classifier:
/// input(784) → hidden1 (ReLU) → hidden2 (ReLU) → logits(10).
/// Weight initialization is Burn's Linear default.
#[derive(Module, Debug)]
pub struct DigitModel<B: Backend> {
    pub fc1: Linear<B>,
    pub fc2: Linear<B>,
    pub output: Linear<B>,
}

impl<B: Backend> DigitModel<B> {
    /// images: [batch, 784] → logits: [batch, 10].
    /// The output layer is linear; softmax is applied by the loss
    /// (training) or the predictor (serving), never here.
    pub fn forward(&self, images: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.fc1.forward(images));
        let x = relu(self.fc2.forward(x));
        self.output.forward(x)
    }
}

/// Mean sparse categorical cross-entropy between softmax(logits)
/// and the true class indices.
///
/// Labels must be valid class indices in [0, 10). The -1 sentinel
/// (and anything else out of range) is rejected up front instead
/// of producing an undefined class lookup — feeding unlabelled
/// prediction records into the loss is a caller error.
pub fn loss<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> Result<Tensor<B, 1>> {
    let values: Vec<i64> = labels.clone().into_data().convert::<i64>().value;
    if let Some(bad) = values
        .iter()
        .find(|&&l| l < 0 || l >= NUM_CLASSES as i64)
    {
        bail!(
            "Label {bad} is outside [0, {}); only labelled records may reach the loss",
            NUM_CLASSES,
        );
    }

    let ce = CrossEntropyLossConfig::new().init(&logits.device());
    Ok(ce.forward(logits, labels))
}

/// Top-1 accuracy: the fraction of examples whose true label is
/// the highest-scoring class. Pure; returns a ratio in [0, 1].
pub fn evaluation<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> f64 {
    let batch_size = labels.dims()[0];
    if batch_size == 0 {
        return 0.0;
    }

    // argmax(1) returns [batch, 1] — squeeze to [batch] before .equal()
    let predicted = logits.argmax(1).flatten::<1>(0, 1);

    let correct: i64 = predicted
        .equal(labels)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();

    correct as f64 / batch_size as f64
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn logits_from(rows: &[[f32; NUM_CLASSES]]) -> Tensor<TestBackend, 2> {
        let flat: Vec<f32> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Tensor::<TestBackend, 1>::from_floats(flat.as_slice(), &Default::default())
            .reshape([rows.len(), NUM_CLASSES])
    }

    fn labels_from(values: &[i32]) -> Tensor<TestBackend, 1, Int> {
        Tensor::<TestBackend, 1, Int>::from_ints(values, &Default::default())
    }

    #[test]
    fn test_logits_shape_with_default_widths() {
        let device = Default::default();
        let model = DigitModelConfig::new(0.01).init::<TestBackend>(&device);

        let images = Tensor::<TestBackend, 2>::zeros([5, IMAGE_PIXELS], &device);
        assert_eq!(model.forward(images).dims(), [5, NUM_CLASSES]);
    }

    #[test]
    fn test_logits_shape_with_degenerate_widths() {
        let device = Default::default();
        let model = DigitModelConfig::new(0.01)
            .with_hidden1(1)
            .with_hidden2(1)
            .init::<TestBackend>(&device);

        let images = Tensor::<TestBackend, 2>::zeros([3, IMAGE_PIXELS], &device);
        assert_eq!(model.forward(images).dims(), [3, NUM_CLASSES]);
    }

    #[test]
    fn test_evaluation_all_correct_is_one() {
        let mut row_2 = [0.0f32; NUM_CLASSES];
        row_2[2] = 5.0;
        let mut row_7 = [0.0f32; NUM_CLASSES];
        row_7[7] = 5.0;

        let acc = evaluation(logits_from(&[row_2, row_7]), labels_from(&[2, 7]));
        assert_eq!(acc, 1.0);
    }

    #[test]
    fn test_evaluation_none_correct_is_zero() {
        let mut row = [0.0f32; NUM_CLASSES];
        row[0] = 5.0;

        let acc = evaluation(logits_from(&[row, row]), labels_from(&[3, 4]));
        assert_eq!(acc, 0.0);
    }

    #[test]
    fn test_evaluation_is_a_ratio() {
        let mut row_hit = [0.0f32; NUM_CLASSES];
        row_hit[1] = 5.0;
        let mut row_miss = [0.0f32; NUM_CLASSES];
        row_miss[0] = 5.0;

        let acc = evaluation(logits_from(&[row_hit, row_miss]), labels_from(&[1, 9]));
        assert!((acc - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_loss_nonnegative_and_shrinks_with_confidence() {
        let mut confident = [0.0f32; NUM_CLASSES];
        confident[4] = 20.0;
        let uniform = [0.0f32; NUM_CLASSES];

        let confident_loss: f64 = loss(logits_from(&[confident]), labels_from(&[4]))
            .unwrap()
            .into_scalar()
            .elem::<f64>();
        let uniform_loss: f64 = loss(logits_from(&[uniform]), labels_from(&[4]))
            .unwrap()
            .into_scalar()
            .elem::<f64>();

        assert!(confident_loss >= 0.0);
        assert!(confident_loss < 1e-3);
        // Uniform logits over 10 classes → loss ≈ ln(10)
        assert!((uniform_loss - 10.0f64.ln()).abs() < 1e-3);
        assert!(confident_loss < uniform_loss);
    }

    #[test]
    fn test_loss_rejects_sentinel_label() {
        let row = [0.0f32; NUM_CLASSES];
        let err = loss(logits_from(&[row]), labels_from(&[-1])).unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_loss_rejects_label_past_last_class() {
        let row = [0.0f32; NUM_CLASSES];
        assert!(loss(logits_from(&[row]), labels_from(&[10])).is_err());
    }
}
