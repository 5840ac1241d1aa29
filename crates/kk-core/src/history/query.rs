use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::record::HistoryRecord;

/// Size of the "recent conversions" strip on the converter screen.
pub const RECENT_HISTORY_LIMIT: usize = 5;

/// Ordering applied to the unfiltered history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Newest first.
    #[default]
    ByDate,
    /// Smallest total length first.
    BySizeAsc,
    /// Largest total length first.
    BySizeDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::ByDate => "date",
            SortOrder::BySizeAsc => "size-asc",
            SortOrder::BySizeDesc => "size-desc",
        }
    }

    // Equal sizes fall back to newest first, matching the SQL ordering.
    fn compare(self, a: &HistoryRecord, b: &HistoryRecord) -> Ordering {
        let newest_first = b.timestamp_ms.cmp(&a.timestamp_ms);
        match self {
            SortOrder::ByDate => newest_first,
            SortOrder::BySizeAsc => a.total_cm.total_cmp(&b.total_cm).then(newest_first),
            SortOrder::BySizeDesc => b.total_cm.total_cmp(&a.total_cm).then(newest_first),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "by-date" => Ok(SortOrder::ByDate),
            "size-asc" | "by-size-asc" => Ok(SortOrder::BySizeAsc),
            "size-desc" | "by-size-desc" => Ok(SortOrder::BySizeDesc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// One query the history store knows how to answer.
///
/// Filtered variants (`Favorites`, `Search`, `Recent`) are always newest first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HistoryQuery {
    All(SortOrder),
    Favorites,
    /// Case-insensitive substring match on input or output text.
    Search(String),
    /// The `n` newest records.
    Recent(usize),
}

impl HistoryQuery {
    pub fn matches(&self, record: &HistoryRecord) -> bool {
        match self {
            HistoryQuery::All(_) | HistoryQuery::Recent(_) => true,
            HistoryQuery::Favorites => record.is_favorite,
            HistoryQuery::Search(needle) => {
                let needle = needle.to_ascii_lowercase();
                record.input_text.to_ascii_lowercase().contains(&needle)
                    || record.output_text.to_ascii_lowercase().contains(&needle)
            }
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        match self {
            HistoryQuery::All(order) => *order,
            _ => SortOrder::ByDate,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            HistoryQuery::Recent(n) => Some(*n),
            _ => None,
        }
    }

    /// Evaluates the query over an in-memory set of records.
    pub fn apply<'a, I>(&self, records: I) -> Vec<HistoryRecord>
    where
        I: IntoIterator<Item = &'a HistoryRecord>,
    {
        let mut selected: Vec<HistoryRecord> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();
        let order = self.sort_order();
        selected.sort_by(|a, b| order.compare(a, b));
        if let Some(limit) = self.limit() {
            selected.truncate(limit);
        }
        selected
    }
}

/// Filter state behind the history screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryFilter {
    pub sort_order: SortOrder,
    pub search_query: String,
    pub favorites_only: bool,
}

impl HistoryFilter {
    /// Picks the single query backing the list.
    ///
    /// A non-empty search wins over the favorites toggle, which wins over the plain
    /// sorted list. Search and favorites never combine.
    pub fn selected_query(&self) -> HistoryQuery {
        if !self.search_query.is_empty() {
            HistoryQuery::Search(self.search_query.clone())
        } else if self.favorites_only {
            HistoryQuery::Favorites
        } else {
            HistoryQuery::All(self.sort_order)
        }
    }
}
