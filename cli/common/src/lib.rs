//! Shared utilities for bucket-tally CLI binaries.
//!
//! Logging setup, the `--log-level` argument and human-readable number
//! formatting used when reporting scan totals.

pub mod args;
pub mod format;
pub mod logging;

pub use args::LogLevel;
pub use format::{format_bytes, format_number, format_size};
pub use logging::init_logging;
