use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info_span, Instrument};

use kk_core::ports::HistoryRepositoryPort;
use kk_core::{HistoryFilter, HistoryRecord};

/// One-shot read of the history list for a filter.
///
/// Uses the same query selection as [`HistoryQueryComposer`](super::HistoryQueryComposer).
pub struct ListHistory {
    repo: Arc<dyn HistoryRepositoryPort>,
}

impl ListHistory {
    pub fn new(repo: Arc<dyn HistoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, filter: &HistoryFilter) -> Result<Vec<HistoryRecord>> {
        let span = info_span!("usecase.list_history.execute");
        async {
            let query = filter.selected_query();
            let records = self.repo.query(&query).await?;
            debug!(query = ?query, count = records.len(), "history listed");
            Ok(records)
        }
        .instrument(span)
        .await
    }
}
