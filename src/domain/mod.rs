// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust definitions of what the system operates on:
// the example record schemas, the dataset constants, and the
// record-level validation rules.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs and serde derives
//
// Everything tensor-shaped lives in Layer 4 (data) and
// Layer 5 (ml); this layer only knows about records.

// Serialized example record schemas + parsing and validation
pub mod record;
