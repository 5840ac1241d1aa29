use std::sync::Arc;

use anyhow::Result;
use tracing::{info_span, Instrument};

use kk_core::ports::HistoryRepositoryPort;
use kk_core::{HistoryQuery, HistoryRecord};

use super::live_query::LiveQuery;

/// The short "recent conversions" strip shown under the converter.
pub struct ListRecentHistory {
    repo: Arc<dyn HistoryRepositoryPort>,
    limit: usize,
}

impl ListRecentHistory {
    pub fn new(repo: Arc<dyn HistoryRepositoryPort>, limit: usize) -> Self {
        Self { repo, limit }
    }

    /// One-shot read of the newest records.
    pub async fn execute(&self) -> Result<Vec<HistoryRecord>> {
        let span = info_span!("usecase.list_recent_history.execute", limit = self.limit);
        self.repo
            .query(&HistoryQuery::Recent(self.limit))
            .instrument(span)
            .await
    }

    /// Live subscription that re-emits after every history change.
    pub fn watch(&self) -> LiveQuery {
        LiveQuery::spawn(Arc::clone(&self.repo), HistoryQuery::Recent(self.limit))
    }
}
