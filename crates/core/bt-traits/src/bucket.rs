//! Object store access trait and related types.

use async_trait::async_trait;
use bt_error::Result;
use bt_types::ObjectDescriptor;
use std::pin::Pin;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

/// A readable body of one object.
///
/// Dropping the body releases the underlying connection.
pub type ObjectBody = Pin<Box<dyn AsyncRead + Send>>;

/// One page of a paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Descriptors in the order the backend returned them
    pub objects: Vec<ObjectDescriptor>,

    /// Opaque marker to pass back for the next page; `None` on the last page
    pub continuation_token: Option<String>,
}

impl ListPage {
    pub fn new(objects: Vec<ObjectDescriptor>, continuation_token: Option<String>) -> Self {
        Self {
            objects,
            continuation_token,
        }
    }

    /// Whether another page follows this one.
    pub fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }
}

/// Handle to a single bucket of a remote object store.
///
/// Credentials, region and endpoint are resolved when the handle is built;
/// the scan core only sees these two calls. Both take a cancellation token
/// and must return [`BtError::Cancelled`](bt_error::BtError::Cancelled) once it fires.
///
/// # Implementations
///
/// - S3 (and S3-compatible services) through the AWS SDK
/// - In-memory bucket for tests
#[async_trait]
pub trait BucketHandle: Send + Sync {
    /// Name of the bucket, for logs.
    fn name(&self) -> &str;

    /// Fetch one page of objects whose keys start with `prefix`.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Key prefix; empty lists the whole bucket
    /// * `continuation_token` - Token from the previous page, `None` for the first
    /// * `cancel` - Cancellation token for the request
    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ListPage>;

    /// Open the content of `key` for reading without fetching it whole.
    async fn open_object(&self, key: &str, cancel: &CancellationToken) -> Result<ObjectBody>;
}
