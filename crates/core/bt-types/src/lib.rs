//! Core types for bucket-tally.
//!
//! This crate provides the data model shared by every scan component:
//! - [`ObjectDescriptor`] - The `{key, size}` record produced per listed object
//! - [`DateRange`] and [`Prefix`] - Calendar ranges and the `YYYY/MM/DD` keys derived from them
//! - [`MatchFilter`] - Optional substring predicate over object keys
//! - [`AggregationResult`] - Total size and matched keys of one scan
//! - [`Chunk`] - A bounded slice of streamed object content

pub mod aggregation;
pub mod chunk;
pub mod descriptor;
pub mod filter;
pub mod range;

pub use aggregation::*;
pub use chunk::*;
pub use descriptor::*;
pub use filter::*;
pub use range::*;
