//! Filtered scan orchestration.

use bt_error::{BtError, Result};
use bt_traits::{BucketHandle, ContentSink};
use bt_types::{AggregationResult, Prefix};
use futures::{StreamExt, pin_mut};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregate::SizeAggregator;
use crate::config::ScanConfig;
use crate::list::list_objects;
use crate::prefixes::PrefixPlan;
use crate::reader::ContentReader;
use crate::stats::{ScanReport, ScanStats};

/// Walks the configured prefixes of a bucket, totals the sizes of matching
/// objects and streams their content to a sink.
///
/// Prefixes are processed in order, one page at a time. A matched object's
/// content is drained completely before the next descriptor is looked at,
/// so at most one content stream is open at any moment.
///
/// Every scan call owns its totals and streams; nothing carries over between
/// calls.
pub struct Scanner<B> {
    bucket: B,
    config: ScanConfig,
    reader: ContentReader,
}

impl<B: BucketHandle> Scanner<B> {
    /// Create a new Scanner.
    ///
    /// # Arguments
    ///
    /// * `bucket` - Handle to the bucket named in `config`
    /// * `config` - What to scan and how
    pub fn new(bucket: B, config: ScanConfig) -> Result<Self> {
        config.validate()?;

        if bucket.name() != config.bucket {
            return Err(BtError::Config(format!(
                "Bucket handle is for '{}' but the scan is configured for '{}'",
                bucket.name(),
                config.bucket
            )));
        }

        let reader = ContentReader::new(config.chunk_size)?;

        Ok(Self {
            bucket,
            config,
            reader,
        })
    }

    pub fn bucket(&self) -> &B {
        &self.bucket
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The prefixes a scan will list, in order.
    pub fn prefixes(&self) -> PrefixPlan {
        PrefixPlan::for_target(&self.config.target, &self.config.key_prefix)
    }

    /// Run a scan and return its aggregation.
    ///
    /// Fails fast: the first listing, read or sink error ends the scan and
    /// no partial result is returned. The sink is flushed either way.
    pub async fn scan<S>(
        &self,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<AggregationResult>
    where
        S: ContentSink + ?Sized,
    {
        Ok(self.scan_with_stats(sink, cancel).await?.result)
    }

    /// Run a scan and return its aggregation together with run statistics.
    pub async fn scan_with_stats<S>(
        &self,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<ScanReport>
    where
        S: ContentSink + ?Sized,
    {
        let mut stats = ScanStats::new();
        let mut aggregator = SizeAggregator::new(self.config.filter.clone());

        let plan = self.prefixes();
        debug!(
            bucket = self.bucket.name(),
            prefixes = plan.len(),
            filter = %self.config.filter.description(),
            stream_content = self.config.stream_content,
            "Scan init"
        );

        let outcome = async {
            for prefix in plan {
                if cancel.is_cancelled() {
                    return Err(BtError::Cancelled);
                }

                self.scan_prefix(&prefix, &mut aggregator, &mut stats, sink, cancel)
                    .await?;
                stats.record_prefix();
            }
            Ok::<(), BtError>(())
        }
        .await;

        // Content already handed to the sink is kept even when the scan fails.
        if let Err(e) = outcome {
            if let Err(flush_err) = sink.flush().await {
                warn!(error = %flush_err, "Failed to flush sink after scan error");
            }
            return Err(e);
        }

        sink.flush().await?;
        stats.complete();

        let result = aggregator.finish();

        debug!(
            bucket = self.bucket.name(),
            prefixes_scanned = stats.prefixes_scanned,
            objects_listed = stats.objects_listed,
            objects_matched = stats.objects_matched,
            total_size = result.total_size,
            bytes_streamed = stats.bytes_streamed,
            "Scan done"
        );

        Ok(ScanReport { result, stats })
    }

    async fn scan_prefix<S>(
        &self,
        prefix: &Prefix,
        aggregator: &mut SizeAggregator,
        stats: &mut ScanStats,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        S: ContentSink + ?Sized,
    {
        debug!(prefix = %prefix, "Listing prefix");

        let stream = list_objects(&self.bucket, prefix.as_str(), cancel);
        pin_mut!(stream);

        while let Some(result) = stream.next().await {
            let obj = result?;
            stats.record_listed();

            if !aggregator.offer(&obj) {
                continue;
            }
            stats.record_match(obj.size());

            info!(key = obj.key(), size = obj.size(), "Processing object");

            if self.config.stream_content {
                let bytes = self.reader.drain(&self.bucket, &obj, sink, cancel).await?;
                stats.record_streamed(bytes);
            }
        }

        Ok(())
    }
}
