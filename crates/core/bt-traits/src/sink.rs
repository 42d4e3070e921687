//! Content sink trait.

use async_trait::async_trait;
use bt_error::Result;
use bt_types::ObjectDescriptor;

/// Destination for the content of matched objects.
///
/// For each object the scan calls [`begin`](ContentSink::begin), then
/// [`write`](ContentSink::write) once per chunk, then
/// [`finish`](ContentSink::finish). If a read fails mid-object, `finish` is
/// not called and chunks already written stay written; the sink decides
/// whether partial content is usable.
#[async_trait]
pub trait ContentSink: Send {
    /// Called before the first chunk of an object.
    async fn begin(&mut self, _object: &ObjectDescriptor) -> Result<()> {
        Ok(())
    }

    /// Receives one chunk of content of `key`, in order.
    async fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Called after the final chunk of an object.
    async fn finish(&mut self, _key: &str) -> Result<()> {
        Ok(())
    }

    /// Flush anything buffered. Called once when a scan completes.
    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
