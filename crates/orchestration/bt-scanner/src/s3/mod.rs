//! S3 access.
//!
//! - Client configuration with custom endpoint and static credential support
//! - [`S3Bucket`], the [`BucketHandle`](bt_traits::BucketHandle) used against real buckets

mod bucket;
mod client;

pub use bucket::S3Bucket;
pub use client::{MAX_PAGE_SIZE, S3Config, create_s3_client};
