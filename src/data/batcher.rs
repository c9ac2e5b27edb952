// ============================================================
// Layer 4 — Digit Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<DigitExample>
// into device-ready tensors.
//
// Input:  Vec of N records, each with exactly 784 image floats
// Output: DigitBatch with images [N, 784] and labels [N]
//
// All records are already validated to the fixed 784 length
// (Layer 3), so stacking is a flatten + reshape with no dynamic
// padding.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::record::{DigitExample, PredictRequest, IMAGE_PIXELS, MISSING_LABEL, NUM_CLASSES};

// ─── DigitBatch ───────────────────────────────────────────────────────────────
/// A batch of labelled examples ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct DigitBatch<B: Backend> {
    /// Flattened images — shape: [batch_size, 784]
    pub images: Tensor<B, 2>,

    /// Class labels — shape: [batch_size], values in [0, 9]
    /// (or the -1 sentinel for unlabelled records)
    pub labels: Tensor<B, 1, Int>,
}

// ─── DigitBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device so tensors land on the right backend.
#[derive(Clone, Debug)]
pub struct DigitBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> DigitBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<DigitExample, DigitBatch<B>> for DigitBatcher<B> {
    fn batch(&self, items: Vec<DigitExample>) -> DigitBatch<B> {
        let batch_size = items.len();

        let image_flat: Vec<f32> = items
            .iter()
            .flat_map(|e| e.images.iter().copied())
            .collect();

        // Burn Int tensors are built from i32 host buffers. Labels
        // outside [0, 10) collapse to the sentinel here so a plain
        // `as` cast can never wrap an oversized i64 into a class
        // index the loss would accept.
        let labels: Vec<i32> = items
            .iter()
            .map(|e| {
                if (0..NUM_CLASSES as i64).contains(&e.labels) {
                    e.labels as i32
                } else {
                    MISSING_LABEL as i32
                }
            })
            .collect();

        let images = Tensor::<B, 1>::from_floats(image_flat.as_slice(), &self.device)
            .reshape([batch_size, IMAGE_PIXELS]);

        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        DigitBatch { images, labels }
    }
}

// ─── Prediction batching ──────────────────────────────────────────────────────
/// A dynamically-sized batch of prediction requests. Keys never
/// touch the device; they are echoed back host-side.
#[derive(Debug, Clone)]
pub struct PredictBatch<B: Backend> {
    pub images: Tensor<B, 2>,
    pub keys: Vec<String>,
}

/// Stack prediction requests into one batch. The prediction graph
/// takes whatever batch size the caller sends.
pub fn batch_prediction<B: Backend>(
    items: &[PredictRequest],
    device: &B::Device,
) -> PredictBatch<B> {
    let batch_size = items.len();

    let image_flat: Vec<f32> = items.iter().flat_map(|r| r.image.iter().copied()).collect();
    let keys: Vec<String> = items.iter().map(|r| r.key.clone()).collect();

    let images = Tensor::<B, 1>::from_floats(image_flat.as_slice(), device)
        .reshape([batch_size, IMAGE_PIXELS]);

    PredictBatch { images, keys }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn example(fill: f32, label: i64) -> DigitExample {
        let mut images = vec![fill; IMAGE_PIXELS];
        images[0] = fill + 0.5;
        DigitExample { images, labels: label }
    }

    #[test]
    fn test_batch_shapes_and_values_roundtrip() {
        let device = Default::default();
        let batcher = DigitBatcher::<TestBackend>::new(device);

        let batch = batcher.batch(vec![example(0.0, 3), example(1.0, 9)]);

        assert_eq!(batch.images.dims(), [2, IMAGE_PIXELS]);
        assert_eq!(batch.labels.dims(), [2]);

        let images: Vec<f32> = batch.images.into_data().convert::<f32>().value;
        // First pixel of each record is fill + 0.5, rest are fill
        assert_eq!(images[0], 0.5);
        assert_eq!(images[1], 0.0);
        assert_eq!(images[IMAGE_PIXELS], 1.5);
        assert_eq!(images[IMAGE_PIXELS + 1], 1.0);

        let labels: Vec<i64> = batch.labels.into_data().convert::<i64>().value;
        assert_eq!(labels, vec![3, 9]);
    }

    #[test]
    fn test_oversized_label_collapses_to_sentinel() {
        let device = Default::default();
        let batcher = DigitBatcher::<TestBackend>::new(device);

        // 2^32 + 3 would wrap to class 3 under a plain i64→i32 cast
        let batch = batcher.batch(vec![
            example(0.0, (1i64 << 32) + 3),
            example(0.0, 7),
            example(0.0, MISSING_LABEL),
        ]);

        let labels: Vec<i64> = batch.labels.into_data().convert::<i64>().value;
        assert_eq!(labels, vec![MISSING_LABEL, 7, MISSING_LABEL]);
    }

    #[test]
    fn test_prediction_batch_echoes_keys() {
        let device = Default::default();
        let requests = vec![
            PredictRequest { image: vec![0.0; IMAGE_PIXELS], key: "a".into() },
            PredictRequest { image: vec![1.0; IMAGE_PIXELS], key: "b".into() },
            PredictRequest { image: vec![2.0; IMAGE_PIXELS], key: "c".into() },
        ];

        let batch = batch_prediction::<TestBackend>(&requests, &device);
        assert_eq!(batch.images.dims(), [3, IMAGE_PIXELS]);
        assert_eq!(batch.keys, vec!["a", "b", "c"]);
    }
}
