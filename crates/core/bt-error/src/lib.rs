//! Error types and classification for bucket-tally.
//!
//! This crate provides:
//! - [`BtError`] - Error enum shared by every scan component
//! - [`ErrorCategory`] - Coarse classification for callers layering their own retry
//! - [`Result`] - Alias used throughout the workspace

use thiserror::Error;

/// Top-level error type for bucket-tally.
#[derive(Error, Debug)]
pub enum BtError {
    /// Fetching a listing page under `prefix` failed.
    #[error("Listing failed for prefix '{prefix}': {cause}")]
    Listing { prefix: String, cause: String },

    /// Opening or reading the content of `key` failed.
    #[error("Stream read failed for '{key}': {cause}")]
    StreamRead { key: String, cause: String },

    /// A date range whose start lies after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },

    /// The content sink rejected a chunk of `key`.
    #[error("Sink failed for '{key}': {cause}")]
    Sink { key: String, cause: String },

    /// A raw storage backend failure, before it is attributed to a prefix or key.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// The operation was cancelled through its cancellation token.
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error classification for callers deciding whether to rerun a scan.
///
/// Nothing inside bucket-tally retries; this only describes the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network or service hiccup, rerunning the scan may succeed.
    ///
    /// Examples: listing timeout, connection reset mid-stream, S3 throttling
    Transient,

    /// Rerunning without changing input will fail the same way.
    ///
    /// Examples: invalid range, bad configuration, access denied
    Permanent,

    /// The caller asked for the work to stop.
    Cancelled,
}

impl BtError {
    /// Build a listing error for `prefix` from any displayable cause.
    pub fn listing(prefix: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Listing {
            prefix: prefix.into(),
            cause: cause.to_string(),
        }
    }

    /// Build a stream read error for `key` from any displayable cause.
    pub fn stream_read(key: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::StreamRead {
            key: key.into(),
            cause: cause.to_string(),
        }
    }

    /// Build a sink error for `key` from any displayable cause.
    pub fn sink(key: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Sink {
            key: key.into(),
            cause: cause.to_string(),
        }
    }

    /// Whether this error came from a cancellation token firing.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Classify the error. See [`ErrorCategory`].
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::InvalidRange { .. } | Self::Config(_) => ErrorCategory::Permanent,
            Self::Listing { cause, .. } | Self::StreamRead { cause, .. } => classify_cause(cause),
            Self::Backend(cause) => classify_cause(cause),
            Self::Sink { .. } => ErrorCategory::Permanent,
            Self::Other(e) => classify_cause(&e.to_string()),
        }
    }
}

fn classify_cause(cause: &str) -> ErrorCategory {
    let cause = cause.to_lowercase();

    if cause.contains("nosuchbucket")
        || cause.contains("nosuchkey")
        || cause.contains("accessdenied")
        || cause.contains("invalidaccesskeyid")
        || cause.contains("403")
        || cause.contains("404")
    {
        ErrorCategory::Permanent
    } else {
        ErrorCategory::Transient
    }
}

/// Result type alias using BtError.
pub type Result<T> = std::result::Result<T, BtError>;
