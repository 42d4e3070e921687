//! Calendar date ranges and the date-partitioned key prefixes derived from them.

use bt_error::{BtError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `chrono` format of a date prefix (`YYYY/MM/DD`).
///
/// Zero-padded, so lexicographic order of prefixes equals chronological order.
pub const PREFIX_DATE_FORMAT: &str = "%Y/%m/%d";

/// Years a date prefix can name. `%Y` pads to four digits and signs anything
/// wider, which would break the ordering of prefixes.
pub const PREFIX_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// `chrono` format accepted for range bounds on the command line.
pub const RANGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A half-open calendar range `[start, end)`.
///
/// `start == end` is a valid, empty range. `start > end` is rejected, as is
/// any range covering a day outside [`PREFIX_YEARS`].
///
/// # Example
///
/// ```
/// use bt_types::DateRange;
///
/// let range = DateRange::parse("2024-01-01..2024-01-04").unwrap();
/// assert_eq!(range.len_days(), 3);
///
/// let empty = DateRange::parse("2024-01-01..2024-01-01").unwrap();
/// assert!(empty.is_empty());
///
/// assert!(DateRange::parse("2024-02-01..2024-01-01").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = BtError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Create a range, inclusive of `start` and exclusive of `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(BtError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let last = if start < end { end.pred_opt() } else { None };
        for date in std::iter::once(start).chain(last) {
            if !PREFIX_YEARS.contains(&date.year()) {
                return Err(BtError::Config(format!(
                    "Date {date} is outside years {}..={}",
                    PREFIX_YEARS.start(),
                    PREFIX_YEARS.end()
                )));
            }
        }

        Ok(Self { start, end })
    }

    /// Every day of a calendar year.
    pub fn year(year: i32) -> Result<Self> {
        if !PREFIX_YEARS.contains(&year) {
            return Err(BtError::Config(format!("Year {year} is out of range")));
        }
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| BtError::Config(format!("Year {year} is out of range")))?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
            .ok_or_else(|| BtError::Config(format!("Year {year} is out of range")))?;
        Self::new(start, end)
    }

    /// Parse a range from `YYYY-MM-DD..YYYY-MM-DD` (end exclusive).
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        let (start, end) = input.split_once("..").ok_or_else(|| {
            BtError::Config(format!(
                "Invalid date range '{input}'. Expected 'YYYY-MM-DD..YYYY-MM-DD'"
            ))
        })?;

        Self::new(parse_day(start)?, parse_day(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day not included in the range.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered.
    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over each day in the range. Can be called any number of times.
    pub fn dates(&self) -> Dates {
        Dates {
            next: self.start,
            end: self.end,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(RANGE_DATE_FORMAT),
            self.end.format(RANGE_DATE_FORMAT)
        )
    }
}

fn parse_day(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, RANGE_DATE_FORMAT)
        .map_err(|e| BtError::Config(format!("Invalid date '{input}': {e}")))
}

/// Iterator over the days of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct Dates {
    next: NaiveDate,
    end: NaiveDate,
}

impl Iterator for Dates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.next >= self.end {
            return None;
        }
        let current = self.next;
        // `current < end`, so a successor always exists.
        self.next = current.succ_opt().unwrap_or(self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next).num_days().max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Dates {}

/// A key prefix used to partition listing calls.
///
/// Date prefixes are formatted with [`PREFIX_DATE_FORMAT`]; arbitrary
/// prefixes (including the empty prefix, which lists the whole bucket) can
/// be built with [`Prefix::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prefix(String);

impl Prefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// The `YYYY/MM/DD` prefix of a single day.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(PREFIX_DATE_FORMAT).to_string())
    }

    /// Prepend a static key prefix, such as `logs/`.
    pub fn with_base(self, base: &str) -> Self {
        if base.is_empty() {
            return self;
        }
        Self(format!("{base}{}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Prefix {
    fn from(prefix: String) -> Self {
        Self(prefix)
    }
}

impl From<&str> for Prefix {
    fn from(prefix: &str) -> Self {
        Self(prefix.to_string())
    }
}
