//! In-memory bucket.
//!
//! Serves listings and content from a sorted map, with knobs for page size
//! and injected failures. Used by the test suites of the scan core and by
//! callers that want to exercise a scan without a remote store.

use async_trait::async_trait;
use bt_error::{BtError, Result};
use bt_traits::{BucketHandle, ListPage, ObjectBody};
use bt_types::ObjectDescriptor;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;

/// Default number of descriptors per listing page, matching S3.
pub const DEFAULT_MEMORY_PAGE_SIZE: usize = 1000;

/// Size of the segments an object body is delivered in.
const BODY_SEGMENT_SIZE: usize = 8 * 1024;

/// A bucket held entirely in memory.
///
/// Continuation tokens are the last key of the previous page.
#[derive(Debug)]
pub struct MemoryBucket {
    name: String,
    objects: BTreeMap<String, Bytes>,
    reported_sizes: HashMap<String, i64>,
    page_size: usize,
    /// prefix -> pages served before listing fails
    listing_failures: HashMap<String, usize>,
    /// key -> bytes served before the body fails
    read_failures: HashMap<String, usize>,
    list_requests: Mutex<Vec<(String, Option<String>)>>,
    open_requests: AtomicUsize,
    open_bodies: Arc<AtomicUsize>,
}

impl MemoryBucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: BTreeMap::new(),
            reported_sizes: HashMap::new(),
            page_size: DEFAULT_MEMORY_PAGE_SIZE,
            listing_failures: HashMap::new(),
            read_failures: HashMap::new(),
            list_requests: Mutex::new(Vec::new()),
            open_requests: AtomicUsize::new(0),
            open_bodies: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Store an object, replacing any previous content under `key`.
    pub fn insert(&mut self, key: impl Into<String>, content: impl Into<Bytes>) {
        self.objects.insert(key.into(), content.into());
    }

    /// Set the maximum number of descriptors per listing page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Report `size` in listings for `key` instead of its stored length.
    pub fn with_reported_size(mut self, key: impl Into<String>, size: i64) -> Self {
        self.reported_sizes.insert(key.into(), size);
        self
    }

    /// Fail every listing request for exactly `prefix`.
    pub fn fail_listing(self, prefix: impl Into<String>) -> Self {
        self.fail_listing_after_pages(prefix, 0)
    }

    /// Serve `pages` pages for `prefix`, then fail.
    pub fn fail_listing_after_pages(mut self, prefix: impl Into<String>, pages: usize) -> Self {
        self.listing_failures.insert(prefix.into(), pages);
        self
    }

    /// Fail the body of `key` with a connection reset after `bytes` bytes.
    pub fn fail_read_after(mut self, key: impl Into<String>, bytes: usize) -> Self {
        self.read_failures.insert(key.into(), bytes);
        self
    }

    /// Every listing request so far, as `(prefix, continuation_token)`.
    pub fn list_requests(&self) -> Vec<(String, Option<String>)> {
        self.requests().clone()
    }

    /// Number of `open_object` calls that returned a body.
    pub fn open_requests(&self) -> usize {
        self.open_requests.load(Ordering::SeqCst)
    }

    /// Bodies handed out and not yet dropped.
    pub fn open_bodies(&self) -> usize {
        self.open_bodies.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn requests(&self) -> MutexGuard<'_, Vec<(String, Option<String>)>> {
        self.list_requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn descriptor(&self, key: &str, content: &Bytes) -> ObjectDescriptor {
        let size = self
            .reported_sizes
            .get(key)
            .copied()
            .unwrap_or(content.len() as i64);
        ObjectDescriptor::new(key, size)
    }

    fn body_segments(&self, key: &str, content: &Bytes) -> Vec<io::Result<Bytes>> {
        let limit = self.read_failures.get(key).copied();
        let served = limit.map_or(content.len(), |n| n.min(content.len()));

        let mut segments: Vec<io::Result<Bytes>> = (0..served)
            .step_by(BODY_SEGMENT_SIZE)
            .map(|start| Ok(content.slice(start..(start + BODY_SEGMENT_SIZE).min(served))))
            .collect();

        if limit.is_some() {
            segments.push(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        segments
    }
}

#[async_trait]
impl BucketHandle for MemoryBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ListPage> {
        if cancel.is_cancelled() {
            return Err(BtError::Cancelled);
        }

        let served = {
            let mut requests = self.requests();
            let served = requests.iter().filter(|(p, _)| p == prefix).count();
            requests.push((prefix.to_string(), continuation_token.map(str::to_string)));
            served
        };

        if let Some(&allowed) = self.listing_failures.get(prefix)
            && served >= allowed
        {
            return Err(BtError::Backend(format!(
                "simulated listing failure for '{prefix}'"
            )));
        }

        let mut matching = self
            .objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .filter(|(key, _)| continuation_token.is_none_or(|token| key.as_str() > token))
            .take(self.page_size + 1);

        let objects: Vec<ObjectDescriptor> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(key, content)| self.descriptor(key, content))
            .collect();
        let has_more = matching.next().is_some();

        let token = if has_more {
            objects.last().map(|o| o.key().to_string())
        } else {
            None
        };

        Ok(ListPage::new(objects, token))
    }

    async fn open_object(&self, key: &str, cancel: &CancellationToken) -> Result<ObjectBody> {
        if cancel.is_cancelled() {
            return Err(BtError::Cancelled);
        }

        let content = self
            .objects
            .get(key)
            .ok_or_else(|| BtError::Backend(format!("NoSuchKey: {key}")))?;

        let segments = self.body_segments(key, content);
        let reader = StreamReader::new(futures::stream::iter(segments));

        self.open_requests.fetch_add(1, Ordering::SeqCst);
        Ok(Box::pin(TrackedBody::new(
            Box::pin(reader),
            Arc::clone(&self.open_bodies),
        )))
    }
}

/// Body wrapper that keeps the bucket's count of live bodies.
struct TrackedBody {
    inner: ObjectBody,
    open: Arc<AtomicUsize>,
}

impl TrackedBody {
    fn new(inner: ObjectBody, open: Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        Self { inner, open }
    }
}

impl AsyncRead for TrackedBody {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.inner.as_mut().poll_read(cx, buf)
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_page_tokens() {
        let mut bucket = MemoryBucket::new("b");
        for key in ["a", "b", "c", "d"] {
            bucket.insert(key, b"1".to_vec());
        }
        let bucket = bucket.with_page_size(2);
        let cancel = CancellationToken::new();

        let first = bucket.list_page("", None, &cancel).await.unwrap();
        assert_eq!(first.continuation_token.as_deref(), Some("b"));

        let second = bucket.list_page("", Some("b"), &cancel).await.unwrap();
        let keys: Vec<&str> = second.objects.iter().map(|o| o.key()).collect();
        assert_eq!(keys, vec!["c", "d"]);
        assert!(!second.has_more());
    }

    #[tokio::test]
    async fn test_reported_size() {
        let mut bucket = MemoryBucket::new("b");
        bucket.insert("a", b"12345".to_vec());
        let bucket = bucket.with_reported_size("a", 42);
        let cancel = CancellationToken::new();

        let page = bucket.list_page("", None, &cancel).await.unwrap();
        assert_eq!(page.objects[0].size(), 42);
    }

    #[tokio::test]
    async fn test_body_tracking() {
        let mut bucket = MemoryBucket::new("b");
        bucket.insert("a", vec![7u8; 20_000]);
        let cancel = CancellationToken::new();

        let mut body = bucket.open_object("a", &cancel).await.unwrap();
        assert_eq!(bucket.open_bodies(), 1);

        let mut content = Vec::new();
        body.read_to_end(&mut content).await.unwrap();
        assert_eq!(content.len(), 20_000);

        drop(body);
        assert_eq!(bucket.open_bodies(), 0);
        assert_eq!(bucket.open_requests(), 1);
    }

    #[tokio::test]
    async fn test_read_failure() {
        let mut bucket = MemoryBucket::new("b");
        bucket.insert("a", vec![7u8; 20_000]);
        let bucket = bucket.fail_read_after("a", 10_000);
        let cancel = CancellationToken::new();

        let mut body = bucket.open_object("a", &cancel).await.unwrap();
        let mut content = Vec::new();
        let err = body.read_to_end(&mut content).await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert!(content.len() <= 10_000);
    }
}
