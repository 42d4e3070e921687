//! Core traits for bucket-tally.
//!
//! This crate defines the seams between the scan core and its collaborators:
//! - [`BucketHandle`] - Paginated listing and content reads against an object store
//! - [`ContentSink`] - Destination for streamed object content

pub mod bucket;
pub mod sink;

pub use bucket::*;
pub use sink::*;
