//! [`BucketHandle`] backed by the AWS SDK.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use bt_error::{BtError, Result};
use bt_traits::{BucketHandle, ListPage, ObjectBody};
use bt_types::ObjectDescriptor;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::client::{MAX_PAGE_SIZE, S3Config, create_s3_client};

/// An S3 (or S3-compatible) bucket.
///
/// Listing uses `ListObjectsV2`; content is read through `GetObject` and
/// streamed from the response body without buffering the whole object.
#[derive(Debug, Clone)]
pub struct S3Bucket {
    client: Client,
    bucket: String,
    page_size: i32,
}

impl S3Bucket {
    /// Wrap an existing client.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Build a client from `config` and wrap it.
    pub async fn connect(config: &S3Config) -> Result<Self> {
        let client = create_s3_client(config).await?;
        Ok(Self::new(client, config.bucket.clone()).with_page_size(config.page_size))
    }

    /// Objects requested per listing page, clamped to `1..=1000`.
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl BucketHandle for S3Bucket {
    fn name(&self) -> &str {
        &self.bucket
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ListPage> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(self.page_size);

        if !prefix.is_empty() {
            req = req.prefix(prefix);
        }

        if let Some(token) = continuation_token {
            req = req.continuation_token(token);
        }

        let resp = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BtError::Cancelled),
            resp = req.send() => resp.map_err(|e| {
                BtError::Backend(format!(
                    "ListObjectsV2 on s3://{}/{}: {}",
                    self.bucket,
                    prefix,
                    DisplayErrorContext(&e)
                ))
            })?,
        };

        let objects: Vec<ObjectDescriptor> = resp
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|obj| {
                let key = obj.key?;
                Some(ObjectDescriptor::new(key, obj.size.unwrap_or(0)))
            })
            .collect();

        let next = if resp.is_truncated == Some(true) {
            resp.next_continuation_token
        } else {
            None
        };

        Ok(ListPage::new(objects, next))
    }

    async fn open_object(&self, key: &str, cancel: &CancellationToken) -> Result<ObjectBody> {
        let req = self.client.get_object().bucket(&self.bucket).key(key);

        let resp = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BtError::Cancelled),
            resp = req.send() => resp.map_err(|e| {
                BtError::Backend(format!(
                    "GetObject on s3://{}/{}: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?,
        };

        debug!(
            bucket = %self.bucket,
            key = key,
            content_length = ?resp.content_length,
            "Opened S3 object"
        );

        Ok(Box::pin(resp.body.into_async_read()))
    }
}
