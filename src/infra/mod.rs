// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the other layers:
//
//   args.rs       — Harness-style argument merging. Implements
//                   the non-destructive override policy: a
//                   default is injected only when the flag is
//                   not already present, so explicit caller
//                   values always win.
//
//   checkpoint.rs — Saving and restoring model weights with
//                   Burn's CompactRecorder, plus the persisted
//                   model config so eval/predict can rebuild
//                   the exact architecture.
//
//   metrics.rs    — Streaming means (update/value split), the
//                   metric/prediction formatting helpers, and
//                   the CSV summary log consumed by external
//                   monitoring tooling.
//
//   export.rs     — The serving signature: named input/output
//                   endpoint registrations written as a flat
//                   string-keyed JSON mapping for the serving
//                   layer to read.

/// Argument-list merge utilities (override_if_not_in_args etc.)
pub mod args;

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Serving signature registration and export
pub mod export;

/// Streaming means, formatting helpers, CSV summary log
pub mod metrics;
