//! Shared helpers for unit tests.

use async_trait::async_trait;
use bt_error::{BtError, Result};
use bt_traits::ContentSink;
use bt_types::ObjectDescriptor;
use std::collections::BTreeMap;

/// Sink that keeps every chunk it receives.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub begun: Vec<String>,
    pub chunks: BTreeMap<String, Vec<Vec<u8>>>,
    pub finished: Vec<String>,
    pub flushes: usize,
    /// Reject writes once this many chunks were accepted.
    pub fail_after_chunks: Option<usize>,
}

impl CollectingSink {
    pub fn failing_after(chunks: usize) -> Self {
        Self {
            fail_after_chunks: Some(chunks),
            ..Default::default()
        }
    }

    /// All bytes received for `key`, concatenated.
    pub fn content(&self, key: &str) -> Vec<u8> {
        self.chunks
            .get(key)
            .map(|chunks| chunks.concat())
            .unwrap_or_default()
    }

    pub fn chunk_count(&self, key: &str) -> usize {
        self.chunks.get(key).map_or(0, Vec::len)
    }

    fn total_chunks(&self) -> usize {
        self.chunks.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl ContentSink for CollectingSink {
    async fn begin(&mut self, object: &ObjectDescriptor) -> Result<()> {
        self.begun.push(object.key().to_string());
        Ok(())
    }

    async fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        if let Some(limit) = self.fail_after_chunks
            && self.total_chunks() >= limit
        {
            return Err(BtError::sink(key, "sink closed"));
        }
        self.chunks
            .entry(key.to_string())
            .or_default()
            .push(bytes.to_vec());
        Ok(())
    }

    async fn finish(&mut self, key: &str) -> Result<()> {
        self.finished.push(key.to_string());
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
