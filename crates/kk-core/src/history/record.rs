use serde::{Deserialize, Serialize};

use crate::ids::HistoryId;

/// A persisted conversion or calculation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: HistoryId,
    pub input_text: String,
    pub output_text: String,
    pub total_cm: f64,
    /// Creation time in epoch milliseconds.
    pub timestamp_ms: i64,
    pub is_favorite: bool,
}

impl HistoryRecord {
    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Records strictly older than `cutoff_ms` are eligible for retention deletion.
    pub fn is_older_than(&self, cutoff_ms: i64) -> bool {
        self.timestamp_ms < cutoff_ms
    }

    /// Two records with the same input and output text are duplicates.
    pub fn same_content(&self, input_text: &str, output_text: &str) -> bool {
        self.input_text == input_text && self.output_text == output_text
    }
}

/// A record that has not been assigned an identity by the store yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHistoryRecord {
    pub input_text: String,
    pub output_text: String,
    pub total_cm: f64,
    pub timestamp_ms: i64,
    pub is_favorite: bool,
}

impl NewHistoryRecord {
    /// New records are never favorites.
    pub fn new(
        input_text: impl Into<String>,
        output_text: impl Into<String>,
        total_cm: f64,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            input_text: input_text.into(),
            output_text: output_text.into(),
            total_cm,
            timestamp_ms,
            is_favorite: false,
        }
    }

    pub fn into_record(self, id: HistoryId) -> HistoryRecord {
        HistoryRecord {
            id,
            input_text: self.input_text,
            output_text: self.output_text,
            total_cm: self.total_cm,
            timestamp_ms: self.timestamp_ms,
            is_favorite: self.is_favorite,
        }
    }
}
