//! Chunked streaming of object content.
//!
//! Objects are read through a buffered reader sized to the chunk size, so a
//! stream never holds more than about two chunks of an object in memory
//! regardless of the object's size.

use bt_error::{BtError, Result};
use bt_traits::{BucketHandle, ContentSink, ObjectBody};
use bt_types::{Chunk, DEFAULT_CHUNK_SIZE, ObjectDescriptor};
use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Opens objects and reads them in fixed-size chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentReader {
    chunk_size: usize,
}

impl Default for ContentReader {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ContentReader {
    /// Create a reader that hands out at most `chunk_size` bytes per chunk.
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(BtError::Config(
                "Chunk size must be at least 1 byte".to_string(),
            ));
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Open `key` for chunked reading.
    pub async fn open<B>(
        &self,
        bucket: &B,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<ObjectStream>
    where
        B: BucketHandle + ?Sized,
    {
        let body = bucket
            .open_object(key, cancel)
            .await
            .map_err(|e| attribute_to_key(key, e))?;

        debug!(bucket = bucket.name(), key = key, "Opened object stream");

        Ok(ObjectStream::new(key, body, self.chunk_size))
    }

    /// Stream the whole content of `object` into `sink`.
    ///
    /// Returns the number of bytes delivered. The object stream lives only
    /// inside this call and is closed however it returns. On a read error,
    /// chunks already written to the sink stay written and `finish` is not
    /// called.
    pub async fn drain<B, S>(
        &self,
        bucket: &B,
        object: &ObjectDescriptor,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<u64>
    where
        B: BucketHandle + ?Sized,
        S: ContentSink + ?Sized,
    {
        let mut stream = self.open(bucket, object.key(), cancel).await?;
        sink.begin(object).await?;

        loop {
            let chunk = stream.read_chunk(cancel).await?;
            if !chunk.is_empty() {
                sink.write(object.key(), &chunk.bytes).await?;
            }
            if chunk.is_final {
                break;
            }
        }

        sink.finish(object.key()).await?;

        trace!(
            key = object.key(),
            bytes = stream.bytes_read(),
            "Drained object stream"
        );

        Ok(stream.bytes_read())
    }
}

/// An open content stream over one object.
///
/// Dropping the stream closes the underlying body.
pub struct ObjectStream {
    key: String,
    reader: BufReader<ObjectBody>,
    chunk_size: usize,
    bytes_read: u64,
    finished: bool,
    /// Error hit while looking ahead past a full chunk; reported on the next read.
    deferred_error: Option<std::io::Error>,
}

impl ObjectStream {
    fn new(key: &str, body: ObjectBody, chunk_size: usize) -> Self {
        Self {
            key: key.to_string(),
            reader: BufReader::with_capacity(chunk_size, body),
            chunk_size,
            bytes_read: 0,
            finished: false,
            deferred_error: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Bytes handed out so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Whether the final chunk has been returned.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Read the next chunk of at most `chunk_size` bytes.
    ///
    /// The chunk carrying the last bytes of the object has `is_final` set.
    /// A zero-byte object yields a single empty final chunk, and reading
    /// past the end keeps returning empty final chunks.
    pub async fn read_chunk(&mut self, cancel: &CancellationToken) -> Result<Chunk> {
        if self.finished {
            return Ok(Chunk::end());
        }
        if let Some(e) = self.deferred_error.take() {
            return Err(BtError::stream_read(&self.key, e));
        }

        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BtError::Cancelled),
            chunk = self.fill_chunk() => chunk?,
        };

        self.bytes_read += chunk.len() as u64;
        self.finished = chunk.is_final;
        Ok(chunk)
    }

    async fn fill_chunk(&mut self) -> Result<Chunk> {
        let mut buf = BytesMut::with_capacity(self.chunk_size);

        while buf.len() < self.chunk_size {
            let available = self
                .reader
                .fill_buf()
                .await
                .map_err(|e| BtError::stream_read(&self.key, e))?;
            if available.is_empty() {
                break;
            }
            let take = available.len().min(self.chunk_size - buf.len());
            buf.extend_from_slice(&available[..take]);
            self.reader.consume(take);
        }

        let is_final = if buf.len() < self.chunk_size {
            true
        } else {
            // Full chunk: peek to learn whether anything follows.
            match self.reader.fill_buf().await {
                Ok(rest) => rest.is_empty(),
                Err(e) => {
                    self.deferred_error = Some(e);
                    false
                }
            }
        };

        Ok(Chunk::new(buf.freeze(), is_final))
    }
}

fn attribute_to_key(key: &str, error: BtError) -> BtError {
    match error {
        BtError::Cancelled | BtError::StreamRead { .. } => error,
        BtError::Backend(cause) => BtError::stream_read(key, cause),
        other => BtError::stream_read(key, other),
    }
}
