//! Streamed content chunks.

use bytes::Bytes;

/// Default chunk size for content streaming (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// One read from an object's content stream.
///
/// `bytes` never exceeds the chunk size the stream was opened with.
/// `is_final` is set on the last chunk, after which the stream holds no
/// further bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub bytes: Bytes,
    pub is_final: bool,
}

impl Chunk {
    pub fn new(bytes: Bytes, is_final: bool) -> Self {
        Self { bytes, is_final }
    }

    /// An empty chunk marking the end of the stream.
    pub fn end() -> Self {
        Self {
            bytes: Bytes::new(),
            is_final: true,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
