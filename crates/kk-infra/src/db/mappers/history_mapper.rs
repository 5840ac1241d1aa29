use anyhow::{ensure, Result};
use kk_core::{HistoryId, HistoryRecord};

use crate::db::models::HistoryRow;
use crate::db::ports::{InsertMapper, RowMapper};

#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryRowMapper;

impl InsertMapper<HistoryRecord, HistoryRow> for HistoryRowMapper {
    fn to_row(&self, domain: &HistoryRecord) -> Result<HistoryRow> {
        ensure!(
            domain.total_cm.is_finite(),
            "history record {} has non-finite total_cm",
            domain.id
        );
        Ok(HistoryRow {
            id: domain.id.as_str().to_string(),
            input_text: domain.input_text.clone(),
            output_text: domain.output_text.clone(),
            total_cm: domain.total_cm,
            created_at_ms: domain.timestamp_ms,
            is_favorite: domain.is_favorite,
        })
    }
}

impl RowMapper<HistoryRow, HistoryRecord> for HistoryRowMapper {
    fn to_domain(&self, row: &HistoryRow) -> Result<HistoryRecord> {
        Ok(HistoryRecord {
            id: HistoryId::from(row.id.as_str()),
            input_text: row.input_text.clone(),
            output_text: row.output_text.clone(),
            total_cm: row.total_cm,
            timestamp_ms: row.created_at_ms,
            is_favorite: row.is_favorite,
        })
    }
}
