// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between serialized records on disk and tensor
// batches on the device:
//
//   .jsonl files
//       │
//       ▼
//   reader            → walks the data directory, collects one
//                       serialized record per line
//       │
//       ▼
//   parse_examples    → record schema + 784-float validation
//       │                (Layer 3 — domain)
//       ▼
//   DigitDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   DigitBatcher      → stacks records into [batch, 784] image
//       │               and [batch] label tensors
//       ▼
//   DataLoader        → shuffling, batching, worker threads
//                       (owned entirely by Burn)

/// Walks data directories and collects serialized records
pub mod reader;

/// Implements Burn's Dataset trait over parsed records
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
