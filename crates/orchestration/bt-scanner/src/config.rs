//! Configuration types for a scan.

use bt_error::{BtError, Result};
use bt_types::{DEFAULT_CHUNK_SIZE, DateRange, MatchFilter};
use serde::{Deserialize, Serialize};

/// What part of the bucket a scan lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanTarget {
    /// A single key prefix; empty means the whole bucket
    Prefix(String),

    /// One `YYYY/MM/DD` prefix per day of the range
    DateRange(DateRange),
}

impl Default for ScanTarget {
    fn default() -> Self {
        Self::Prefix(String::new())
    }
}

/// Configuration for one scan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Bucket name; must match the bucket handle the scan runs against
    pub bucket: String,

    /// Prefix or date range to list
    pub target: ScanTarget,

    /// Key filter applied to every listed object
    pub filter: MatchFilter,

    /// Maximum bytes handed to the sink per chunk
    pub chunk_size: usize,

    /// Stream the content of matched objects (false = sizes only)
    pub stream_content: bool,

    /// Static text prepended to every date prefix (e.g. "logs/")
    pub key_prefix: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            target: ScanTarget::default(),
            filter: MatchFilter::All,
            chunk_size: DEFAULT_CHUNK_SIZE,
            stream_content: true,
            key_prefix: String::new(),
        }
    }
}

impl ScanConfig {
    /// Create a new scan configuration for `bucket` with defaults.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Scan a single prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.target = ScanTarget::Prefix(prefix.into());
        self
    }

    /// Scan one prefix per day of `range`.
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.target = ScanTarget::DateRange(range);
        self
    }

    /// Set the key filter.
    pub fn with_filter(mut self, filter: MatchFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the chunk size for content streaming.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Enable or disable content streaming.
    pub fn with_stream_content(mut self, stream_content: bool) -> Self {
        self.stream_content = stream_content;
        self
    }

    /// Set the static text prepended to date prefixes.
    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// Check the configuration for values a scan cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(BtError::Config("Bucket name must not be empty".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(BtError::Config(
                "Chunk size must be at least 1 byte".to_string(),
            ));
        }
        Ok(())
    }
}
