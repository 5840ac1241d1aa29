use std::sync::Arc;

use anyhow::Result;
use tracing::{info_span, Instrument};

use kk_core::ports::HistoryRepositoryPort;
use kk_core::{HistoryId, ReuseTarget};

/// Resolves a stored record back into converter input.
pub struct ReuseHistoryRecord {
    repo: Arc<dyn HistoryRepositoryPort>,
}

impl ReuseHistoryRecord {
    pub fn new(repo: Arc<dyn HistoryRepositoryPort>) -> Self {
        Self { repo }
    }

    /// Returns `Ok(None)` when the record no longer exists.
    pub async fn execute(&self, id: &HistoryId) -> Result<Option<ReuseTarget>> {
        let span = info_span!("usecase.reuse_history_record.execute", id = %id);
        async {
            let record = self.repo.get(id).await?;
            Ok(record.map(|r| r.reuse()))
        }
        .instrument(span)
        .await
    }
}
