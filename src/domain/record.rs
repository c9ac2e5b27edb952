// ============================================================
// Layer 3 — Example Records
// ============================================================
// The wire schemas for serialized MNIST example records.
//
// Two schemas exist:
//   - training/eval: {"images": [f32; 784], "labels": 0..=9}
//     where "labels" defaults to -1 when absent
//   - prediction:    {"image":  [f32; 784], "key": "opaque-id"}
//
// Records arrive one per line as JSON (JSONL). Parsing fails
// loudly when the image vector is not exactly 784 floats —
// there is no way to recover from a malformed record.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// The MNIST dataset has 10 classes, the digits 0 through 9.
pub const NUM_CLASSES: usize = 10;

/// MNIST images are always 28x28 pixels.
pub const IMAGE_SIZE: usize = 28;
pub const IMAGE_PIXELS: usize = IMAGE_SIZE * IMAGE_SIZE;

/// Sentinel label for records that carry no label.
pub const MISSING_LABEL: i64 = -1;

fn missing_label() -> i64 {
    MISSING_LABEL
}

/// One labelled example as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitExample {
    /// Flattened 28x28 image, exactly 784 float values
    pub images: Vec<f32>,

    /// Class index in [0, 9], or -1 when the record is unlabelled
    #[serde(default = "missing_label")]
    pub labels: i64,
}

impl DigitExample {
    /// True when the label is a valid class index.
    pub fn is_labelled(&self) -> bool {
        (0..NUM_CLASSES as i64).contains(&self.labels)
    }
}

/// One prediction request as it appears on the wire.
/// The key is opaque: it is echoed back untouched so the caller
/// can match responses to requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub image: Vec<f32>,
    pub key: String,
}

/// Deserialize a batch of serialized training/eval records.
///
/// Fails on the first record whose image vector length is not
/// exactly `IMAGE_PIXELS`. Labels are not range-checked here:
/// the loss enforces that contract (a record may legitimately
/// carry the -1 sentinel until it reaches a labelled pipeline).
pub fn parse_examples(records: &[String]) -> Result<Vec<DigitExample>> {
    let mut examples = Vec::with_capacity(records.len());

    for (idx, raw) in records.iter().enumerate() {
        let example: DigitExample = serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("Malformed example record {idx}: {e}"))?;

        if example.images.len() != IMAGE_PIXELS {
            bail!(
                "Example record {idx}: image vector has {} values, expected {}",
                example.images.len(),
                IMAGE_PIXELS,
            );
        }
        examples.push(example);
    }

    Ok(examples)
}

/// Deserialize a batch of serialized prediction records.
/// Same 784-float invariant as `parse_examples`.
pub fn parse_prediction_records(records: &[String]) -> Result<Vec<PredictRequest>> {
    let mut requests = Vec::with_capacity(records.len());

    for (idx, raw) in records.iter().enumerate() {
        let request: PredictRequest = serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("Malformed prediction record {idx}: {e}"))?;

        if request.image.len() != IMAGE_PIXELS {
            bail!(
                "Prediction record {idx} (key '{}'): image vector has {} values, expected {}",
                request.key,
                request.image.len(),
                IMAGE_PIXELS,
            );
        }
        requests.push(request);
    }

    Ok(requests)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn encode(images: &[f32], labels: Option<i64>) -> String {
        match labels {
            Some(l) => serde_json::to_string(&serde_json::json!({
                "images": images, "labels": l
            }))
            .unwrap(),
            None => serde_json::to_string(&serde_json::json!({ "images": images })).unwrap(),
        }
    }

    #[test]
    fn test_parse_preserves_values() {
        let mut pixels = vec![0.0f32; IMAGE_PIXELS];
        pixels[0] = 0.25;
        pixels[783] = 1.0;
        let records = vec![encode(&pixels, Some(7)), encode(&pixels, Some(0))];

        let parsed = parse_examples(&records).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].labels, 7);
        assert_eq!(parsed[1].labels, 0);
        assert_eq!(parsed[0].images[0], 0.25);
        assert_eq!(parsed[0].images[783], 1.0);
    }

    #[test]
    fn test_missing_label_defaults_to_sentinel() {
        let pixels = vec![0.0f32; IMAGE_PIXELS];
        let parsed = parse_examples(&[encode(&pixels, None)]).unwrap();
        assert_eq!(parsed[0].labels, MISSING_LABEL);
        assert!(!parsed[0].is_labelled());
    }

    #[test]
    fn test_wrong_image_length_rejected() {
        let pixels = vec![0.0f32; IMAGE_PIXELS - 1];
        let err = parse_examples(&[encode(&pixels, Some(3))]).unwrap_err();
        assert!(err.to_string().contains("expected 784"));
    }

    #[test]
    fn test_prediction_record_roundtrip() {
        let pixels = vec![0.5f32; IMAGE_PIXELS];
        let raw = serde_json::to_string(&serde_json::json!({
            "image": pixels, "key": "img-0042"
        }))
        .unwrap();

        let parsed = parse_prediction_records(&[raw]).unwrap();
        assert_eq!(parsed[0].key, "img-0042");
        assert_eq!(parsed[0].image.len(), IMAGE_PIXELS);
    }
}
