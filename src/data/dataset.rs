use burn::data::dataset::Dataset;

use crate::domain::record::DigitExample;

/// In-memory dataset of parsed example records.
pub struct DigitDataset {
    examples: Vec<DigitExample>,
}

impl DigitDataset {
    pub fn new(examples: Vec<DigitExample>) -> Self {
        Self { examples }
    }

    /// Keep only the first `limit` examples (the eval-set-size cap).
    pub fn truncated(mut self, limit: usize) -> Self {
        self.examples.truncate(limit);
        self
    }

    pub fn sample_count(&self) -> usize {
        self.examples.len()
    }
}

impl Dataset<DigitExample> for DigitDataset {
    fn get(&self, index: usize) -> Option<DigitExample> {
        self.examples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.examples.len()
    }
}
