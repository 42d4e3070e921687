//! Content sink implementations.
//!
//! - [`WriterSink`] - Copies content to any async writer, such as stdout
//! - [`DiscardSink`] - Counts content and drops it

use async_trait::async_trait;
use bt_error::{BtError, Result};
use bt_traits::ContentSink;
use bt_types::ObjectDescriptor;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};

/// Writes object content to an async writer, in scan order.
///
/// With headers enabled, each object is preceded by a line of the form
/// `==> key (size bytes) <==`.
pub struct WriterSink<W> {
    writer: W,
    headers: bool,
    bytes_written: u64,
}

impl<W> WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            headers: false,
            bytes_written: 0,
        }
    }

    /// Print a header line before each object's content.
    pub fn with_headers(mut self, headers: bool) -> Self {
        self.headers = headers;
        self
    }

    /// Content bytes written so far, headers excluded.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<Stdout> {
    /// Sink that writes to the process's stdout.
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W> ContentSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn begin(&mut self, object: &ObjectDescriptor) -> Result<()> {
        if self.headers {
            let header = format!("==> {} ({} bytes) <==\n", object.key(), object.size());
            self.writer
                .write_all(header.as_bytes())
                .await
                .map_err(|e| BtError::sink(object.key(), e))?;
        }
        Ok(())
    }

    async fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .await
            .map_err(|e| BtError::sink(key, e))?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    async fn finish(&mut self, key: &str) -> Result<()> {
        if self.headers {
            self.writer
                .write_all(b"\n")
                .await
                .map_err(|e| BtError::sink(key, e))?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .await
            .map_err(|e| BtError::sink("<flush>", e))
    }
}

/// Drops all content, keeping only a byte count.
#[derive(Debug, Default)]
pub struct DiscardSink {
    bytes: u64,
}

impl DiscardSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

#[async_trait]
impl ContentSink for DiscardSink {
    async fn write(&mut self, _key: &str, bytes: &[u8]) -> Result<()> {
        self.bytes += bytes.len() as u64;
        Ok(())
    }
}
