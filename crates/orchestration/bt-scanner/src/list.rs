//! Paginated object listing.

use async_stream::try_stream;
use bt_error::{BtError, Result};
use bt_traits::BucketHandle;
use bt_types::ObjectDescriptor;
use futures::Stream;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// List the objects under `prefix`.
///
/// Returns a lazy stream of [`ObjectDescriptor`]s in backend order, following
/// continuation tokens internally. The next page is only requested once the
/// consumer has taken every descriptor of the current one.
///
/// A failed page ends the stream with [`BtError::Listing`] (or
/// [`BtError::Cancelled`]); descriptors already yielded stay valid.
///
/// # Example
///
/// ```ignore
/// use futures::{StreamExt, pin_mut};
///
/// let stream = list_objects(&bucket, "2024/01/01", &cancel);
/// pin_mut!(stream);
///
/// while let Some(result) = stream.next().await {
///     let obj = result?;
///     println!("Found: {} ({} bytes)", obj.key(), obj.size());
/// }
/// ```
pub fn list_objects<'a, B>(
    bucket: &'a B,
    prefix: &'a str,
    cancel: &'a CancellationToken,
) -> impl Stream<Item = Result<ObjectDescriptor>> + Send + 'a
where
    B: BucketHandle + ?Sized,
{
    try_stream! {
        let mut continuation_token: Option<String> = None;
        let mut page_number: u64 = 0;

        loop {
            let page = bucket
                .list_page(prefix, continuation_token.as_deref(), cancel)
                .await
                .map_err(|e| attribute_to_prefix(prefix, e))?;
            page_number += 1;

            trace!(
                bucket = bucket.name(),
                prefix = prefix,
                page = page_number,
                objects = page.objects.len(),
                has_more = page.has_more(),
                "Fetched listing page"
            );

            for obj in page.objects {
                yield obj;
            }

            match page.continuation_token {
                Some(token) => continuation_token = Some(token),
                None => break,
            }
        }
    }
}

fn attribute_to_prefix(prefix: &str, error: BtError) -> BtError {
    match error {
        BtError::Cancelled | BtError::Listing { .. } => error,
        BtError::Backend(cause) => BtError::listing(prefix, cause),
        other => BtError::listing(prefix, other),
    }
}
