//! Aggregated scan output.

use serde::{Deserialize, Serialize};

/// Total size and matched keys accumulated over one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Sum of listed sizes of matched objects, in bytes
    pub total_size: i64,

    /// Keys of matched objects, in encounter order
    pub matched_keys: Vec<String>,
}

impl AggregationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matched objects.
    pub fn matched_count(&self) -> usize {
        self.matched_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched_keys.is_empty()
    }
}
