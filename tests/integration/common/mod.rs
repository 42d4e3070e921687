//! Common utilities for integration tests.
//!
//! Shared LocalStack setup and test data generation.

pub mod localstack;

pub use localstack::{LocalStackTestContext, generate_client_list};
