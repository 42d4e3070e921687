//! Date-range prefix enumeration.
//!
//! Date-partitioned buckets store each day's objects under a `YYYY/MM/DD`
//! prefix. A range is scanned by listing each day's prefix in turn.

use bt_types::{DateRange, Dates, Prefix};

use crate::config::ScanTarget;

/// Enumerate one prefix per day of `range`, in chronological order.
///
/// Pure and restartable: the same range always yields the same prefixes.
///
/// # Example
///
/// ```
/// use bt_scanner::enumerate_prefixes;
/// use bt_types::DateRange;
///
/// let range = DateRange::parse("2024-02-28..2024-03-01").unwrap();
/// let prefixes: Vec<String> = enumerate_prefixes(&range)
///     .map(|p| p.into_string())
///     .collect();
///
/// assert_eq!(prefixes, vec!["2024/02/28", "2024/02/29"]);
/// ```
pub fn enumerate_prefixes(range: &DateRange) -> DatePrefixes {
    DatePrefixes {
        dates: range.dates(),
        base: String::new(),
    }
}

/// Iterator over the daily prefixes of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DatePrefixes {
    dates: Dates,
    base: String,
}

impl DatePrefixes {
    /// Prepend `base` to every prefix.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }
}

impl Iterator for DatePrefixes {
    type Item = Prefix;

    fn next(&mut self) -> Option<Prefix> {
        self.dates
            .next()
            .map(|date| Prefix::from_date(date).with_base(&self.base))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.dates.size_hint()
    }
}

impl ExactSizeIterator for DatePrefixes {}

/// The ordered prefixes a scan target expands to.
#[derive(Debug, Clone)]
pub enum PrefixPlan {
    Single(std::option::IntoIter<Prefix>),
    Dates(DatePrefixes),
}

impl PrefixPlan {
    /// Expand a scan target. `base` only applies to date prefixes.
    pub fn for_target(target: &ScanTarget, base: &str) -> Self {
        match target {
            ScanTarget::Prefix(prefix) => Self::Single(Some(Prefix::new(prefix.clone())).into_iter()),
            ScanTarget::DateRange(range) => Self::Dates(enumerate_prefixes(range).with_base(base)),
        }
    }
}

impl Iterator for PrefixPlan {
    type Item = Prefix;

    fn next(&mut self) -> Option<Prefix> {
        match self {
            Self::Single(inner) => inner.next(),
            Self::Dates(inner) => inner.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Single(inner) => inner.size_hint(),
            Self::Dates(inner) => inner.size_hint(),
        }
    }
}

impl ExactSizeIterator for PrefixPlan {}
