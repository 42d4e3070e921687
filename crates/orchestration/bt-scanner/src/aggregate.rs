//! Size aggregation over listed objects.

use bt_error::Result;
use bt_types::{AggregationResult, MatchFilter, ObjectDescriptor};
use futures::{Stream, StreamExt, pin_mut};

/// Running totals for one scan.
///
/// Sizes accumulate in a signed 64-bit total with no overflow guard.
#[derive(Debug, Clone, Default)]
pub struct SizeAggregator {
    filter: MatchFilter,
    result: AggregationResult,
}

impl SizeAggregator {
    pub fn new(filter: MatchFilter) -> Self {
        Self {
            filter,
            result: AggregationResult::default(),
        }
    }

    /// Count `obj` if its key passes the filter. Returns whether it matched.
    pub fn offer(&mut self, obj: &ObjectDescriptor) -> bool {
        if !self.filter.matches(obj.key()) {
            return false;
        }
        // Unguarded: sums past i64::MAX wrap.
        self.result.total_size = self.result.total_size.wrapping_add(obj.size());
        self.result.matched_keys.push(obj.key().to_string());
        true
    }

    /// Total size matched so far.
    pub fn total_size(&self) -> i64 {
        self.result.total_size
    }

    pub fn matched_count(&self) -> usize {
        self.result.matched_keys.len()
    }

    pub fn finish(self) -> AggregationResult {
        self.result
    }
}

/// Sum the sizes of all descriptors matching `filter`.
///
/// # Example
///
/// ```
/// use bt_scanner::aggregate;
/// use bt_types::{MatchFilter, ObjectDescriptor};
///
/// let objects = vec![
///     ObjectDescriptor::new("2024/01/01/list_clients_a.json", 100),
///     ObjectDescriptor::new("2024/01/01/other.json", 50),
/// ];
///
/// let result = aggregate(objects, &MatchFilter::substring("list_clients"));
/// assert_eq!(result.total_size, 100);
/// assert_eq!(result.matched_keys, vec!["2024/01/01/list_clients_a.json"]);
/// ```
pub fn aggregate<I>(descriptors: I, filter: &MatchFilter) -> AggregationResult
where
    I: IntoIterator<Item = ObjectDescriptor>,
{
    let mut aggregator = SizeAggregator::new(filter.clone());
    for obj in descriptors {
        aggregator.offer(&obj);
    }
    aggregator.finish()
}

/// Like [`aggregate`], over a fallible stream such as a listing.
///
/// Stops at the first error; no partial result is returned.
pub async fn aggregate_stream<S>(descriptors: S, filter: &MatchFilter) -> Result<AggregationResult>
where
    S: Stream<Item = Result<ObjectDescriptor>>,
{
    let mut aggregator = SizeAggregator::new(filter.clone());

    pin_mut!(descriptors);
    while let Some(obj) = descriptors.next().await {
        aggregator.offer(&obj?);
    }

    Ok(aggregator.finish())
}
