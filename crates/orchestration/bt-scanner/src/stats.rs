//! Statistics for scan runs.

use bt_types::AggregationResult;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Counters collected during a scan run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanStats {
    /// When the scan started
    pub started_at: Option<DateTime<Utc>>,

    /// When the scan completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Prefixes whose listing was fully consumed
    pub prefixes_scanned: usize,

    /// Descriptors listed, before filtering
    pub objects_listed: usize,

    /// Descriptors that passed the filter
    pub objects_matched: usize,

    /// Listed size of matched objects
    pub bytes_matched: i64,

    /// Content bytes delivered to the sink
    pub bytes_streamed: u64,
}

impl ScanStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark the scan as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn record_listed(&mut self) {
        self.objects_listed += 1;
    }

    pub fn record_match(&mut self, size: i64) {
        self.objects_matched += 1;
        self.bytes_matched = self.bytes_matched.wrapping_add(size);
    }

    pub fn record_streamed(&mut self, bytes: u64) {
        self.bytes_streamed += bytes;
    }

    pub fn record_prefix(&mut self) {
        self.prefixes_scanned += 1;
    }

    /// Objects that were listed but did not pass the filter.
    pub fn objects_skipped(&self) -> usize {
        self.objects_listed - self.objects_matched
    }

    /// Get the duration of the scan run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Listed objects per second.
    pub fn objects_per_second(&self) -> Option<f64> {
        self.duration().map(|d| {
            let secs = d.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                self.objects_listed as f64 / secs
            } else {
                0.0
            }
        })
    }
}

/// Outcome of a scan together with its run statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub result: AggregationResult,
    pub stats: ScanStats,
}
