// ============================================================
// Layer 6 — Serving Signature Export
// ============================================================
// The serving harness does not know our code; it reads a flat
// string-keyed mapping that names the tensors to feed and fetch:
//
//   inputs:  { "examples_bytes": "examples" }
//   outputs: { "key": "key", "prediction": "prediction",
//              "scores": "scores" }
//
// Endpoint names ending in the reserved "_bytes" suffix tell
// the serving layer that the value is raw bytes and must be
// base64 encoded/decoded when transported over HTTP. That
// applies to the serialized input records here.
//
// Output file: <export_dir>/signature.json

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::PathBuf};

/// Endpoint names with this suffix carry base64-transported bytes.
pub const BYTES_SUFFIX: &str = "_bytes";

/// True when the named endpoint must be base64 encoded over HTTP.
pub fn is_base64_endpoint(name: &str) -> bool {
    name.ends_with(BYTES_SUFFIX)
}

/// The named input/output endpoint registrations of the
/// prediction graph, serialized for the serving layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingSignature {
    /// Logical input name → tensor identifier
    pub inputs: BTreeMap<String, String>,

    /// Logical output name → tensor identifier
    pub outputs: BTreeMap<String, String>,
}

impl ServingSignature {
    /// The signature of the digit-classifier prediction graph:
    /// raw serialized records in; echoed key, predicted class and
    /// full softmax score vector out.
    pub fn digit_classifier() -> Self {
        let mut inputs = BTreeMap::new();
        inputs.insert("examples_bytes".to_string(), "examples".to_string());

        let mut outputs = BTreeMap::new();
        outputs.insert("key".to_string(), "key".to_string());
        outputs.insert("prediction".to_string(), "prediction".to_string());
        outputs.insert("scores".to_string(), "scores".to_string());

        Self { inputs, outputs }
    }

    /// Write the signature to `<export_dir>/signature.json`.
    pub fn write(&self, export_dir: impl Into<String>) -> Result<PathBuf> {
        let dir = PathBuf::from(export_dir.into());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create export dir '{}'", dir.display()))?;

        let path = dir.join("signature.json");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write signature to '{}'", path.display()))?;

        for name in self.inputs.keys().chain(self.outputs.keys()) {
            if is_base64_endpoint(name) {
                tracing::debug!("Endpoint '{}' is base64-transported over HTTP", name);
            }
        }

        tracing::info!("Exported serving signature to '{}'", path.display());
        Ok(path)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_endpoints() {
        let sig = ServingSignature::digit_classifier();
        assert_eq!(sig.inputs.get("examples_bytes").unwrap(), "examples");
        assert_eq!(sig.outputs.len(), 3);
        assert!(sig.outputs.contains_key("key"));
        assert!(sig.outputs.contains_key("prediction"));
        assert!(sig.outputs.contains_key("scores"));
    }

    #[test]
    fn test_bytes_suffix_marks_base64_transport() {
        assert!(is_base64_endpoint("examples_bytes"));
        assert!(!is_base64_endpoint("scores"));
    }

    #[test]
    fn test_signature_serializes_as_flat_mapping() {
        let sig = ServingSignature::digit_classifier();
        let json = serde_json::to_string(&sig).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["inputs"]["examples_bytes"], "examples");
        assert_eq!(value["outputs"]["prediction"], "prediction");
    }
}
