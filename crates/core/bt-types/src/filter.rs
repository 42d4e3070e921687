//! Key match filtering.

use serde::{Deserialize, Serialize};

/// An optional substring predicate over object keys.
///
/// # Example
///
/// ```
/// use bt_types::MatchFilter;
///
/// let filter = MatchFilter::substring("list_clients");
/// assert!(filter.matches("2024/01/01/list_clients_a.json"));
/// assert!(!filter.matches("2024/01/01/other.json"));
///
/// assert!(MatchFilter::All.matches("anything"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFilter {
    /// No filter: every key matches.
    #[default]
    All,

    /// Keys containing this text (case-sensitive) match.
    Substring(String),
}

impl MatchFilter {
    /// Create a substring filter.
    pub fn substring(needle: impl Into<String>) -> Self {
        Self::Substring(needle.into())
    }

    /// `None` means match everything.
    pub fn from_option(needle: Option<String>) -> Self {
        match needle {
            Some(needle) => Self::Substring(needle),
            None => Self::All,
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::All => true,
            Self::Substring(needle) => key.contains(needle.as_str()),
        }
    }

    /// Human-readable form for logs.
    pub fn description(&self) -> String {
        match self {
            Self::All => "all".to_string(),
            Self::Substring(needle) => format!("contains({needle})"),
        }
    }
}
