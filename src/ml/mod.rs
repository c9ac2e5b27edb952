// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn-specific numerics live in this layer; the framework
// owns matrix multiplication, autodiff, the SGD update and the
// DataLoader scheduling. This layer only wires the pipeline:
//
//   model.rs     — The 3-layer fully connected classifier
//                  784 → hidden1 (ReLU) → hidden2 (ReLU) → 10
//                  plus the loss and accuracy operations
//
//   trainer.rs   — The training pipeline: shuffled infinite
//                  input, SGD steps, the global step counter,
//                  streaming means, periodic eval + checkpoints
//
//   evaluator.rs — The evaluation pipeline: unshuffled fixed
//                  number of passes, streaming means, no
//                  optimizer
//
//   predictor.rs — Inference → softmax → argmax for serving

/// Fully connected digit classifier + loss and accuracy
pub mod model;

/// Training loop with global step, streaming means, checkpoints
pub mod trainer;

/// Evaluation loop over a fixed number of passes
pub mod evaluator;

/// Batch prediction (softmax scores + argmax class)
pub mod predictor;

/// Backend used for training (autodiff on top of ndarray).
pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

/// Backend used for eval and prediction (no autodiff overhead).
pub type InferBackend = burn::backend::NdArray;

/// The one device this CPU pipeline runs on.
pub fn default_device() -> burn::backend::ndarray::NdArrayDevice {
    burn::backend::ndarray::NdArrayDevice::Cpu
}
