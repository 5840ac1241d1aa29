use kk_core::NewHistoryRecord;
use serde::Serialize;

/// Display strings for one successful conversion or calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionOutcome {
    pub input_text: String,
    pub output_text: String,
    pub total_cm: f64,
}

impl ConversionOutcome {
    pub(crate) fn to_history(&self, timestamp_ms: i64) -> NewHistoryRecord {
        NewHistoryRecord::new(
            self.input_text.clone(),
            self.output_text.clone(),
            self.total_cm,
            timestamp_ms,
        )
    }
}
