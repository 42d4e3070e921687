//! bt-scanner - date-partitioned bucket inventory for bucket-tally.
//!
//! This crate walks the objects of a bucket under a single prefix or under
//! one `YYYY/MM/DD` prefix per day of a date range, and:
//!
//! - Lists objects page by page, following continuation tokens lazily
//! - Totals the listed sizes of objects whose key matches a filter
//! - Streams matched objects' content in bounded chunks to a sink
//! - Reports run statistics (objects listed/matched, bytes streamed, duration)
//!
//! # Example
//!
//! ```ignore
//! use bt_scanner::{ScanConfig, Scanner, S3Bucket, S3Config, WriterSink};
//! use bt_types::{DateRange, MatchFilter};
//! use tokio_util::sync::CancellationToken;
//!
//! let bucket = S3Bucket::connect(
//!     &S3Config::new("my-logs").with_endpoint("http://localhost:4566"),
//! )
//! .await?;
//!
//! let config = ScanConfig::new("my-logs")
//!     .with_date_range(DateRange::year(2024)?)
//!     .with_filter(MatchFilter::substring("list_clients"));
//!
//! let scanner = Scanner::new(bucket, config)?;
//! let mut sink = WriterSink::stdout();
//!
//! let result = scanner.scan(&mut sink, &CancellationToken::new()).await?;
//! eprintln!("{} bytes in {} objects", result.total_size, result.matched_count());
//! ```

pub mod aggregate;
pub mod config;
pub mod list;
pub mod memory;
pub mod prefixes;
pub mod reader;
pub mod s3;
pub mod scanner;
pub mod sink;
pub mod stats;

#[cfg(test)]
mod test_support;

pub use aggregate::{SizeAggregator, aggregate, aggregate_stream};
pub use config::{ScanConfig, ScanTarget};
pub use list::list_objects;
pub use memory::MemoryBucket;
pub use prefixes::{DatePrefixes, PrefixPlan, enumerate_prefixes};
pub use reader::{ContentReader, ObjectStream};
pub use s3::{S3Bucket, S3Config, create_s3_client};
pub use scanner::Scanner;
pub use sink::{DiscardSink, WriterSink};
pub use stats::{ScanReport, ScanStats};
