// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestration only: each use case wires the data, ml and
// infra layers into one mode-specific pipeline and runs it.
// The three modes are distinct types with distinct outputs —
// there is no partially-populated shared result struct.
//
//   factory.rs          — the model factory: parses
//                         --learning_rate, injects the six
//                         harness defaults non-destructively,
//                         hands back the residual args
//   train_use_case.rs   — the training pipeline
//   eval_use_case.rs    — the evaluation pipeline
//   predict_use_case.rs — prediction + serving export

// Model factory and harness hyperparameters
pub mod factory;

// The training workflow
pub mod train_use_case;

// The evaluation workflow
pub mod eval_use_case;

// The prediction/export workflow
pub mod predict_use_case;
