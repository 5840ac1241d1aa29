use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use kk_core::ports::HistoryRepositoryPort;
use kk_core::{HistoryId, HistoryRecord};

use super::writer::HistoryWriter;

/// Flips or sets the favorite flag of a history record.
pub struct ToggleFavorite {
    repo: Arc<dyn HistoryRepositoryPort>,
    writer: HistoryWriter,
}

impl ToggleFavorite {
    pub fn new(repo: Arc<dyn HistoryRepositoryPort>, writer: HistoryWriter) -> Self {
        Self { repo, writer }
    }

    /// Submits the flipped record. Returns the record as it will be stored.
    pub fn execute(&self, record: &HistoryRecord) -> HistoryRecord {
        let updated = record.clone().with_favorite(!record.is_favorite);
        info!(id = %updated.id, favorite = updated.is_favorite, "toggling favorite");
        self.writer.update(updated.clone());
        updated
    }

    /// Looks the record up and submits it with `favorite` set.
    /// Returns `Ok(None)` when no such record exists.
    #[tracing::instrument(name = "usecase.toggle_favorite.set", skip(self, id), fields(id = %id))]
    pub async fn set(&self, id: &HistoryId, favorite: bool) -> Result<Option<HistoryRecord>> {
        let Some(record) = self.repo.get(id).await? else {
            return Ok(None);
        };
        let updated = record.with_favorite(favorite);
        self.writer.update(updated.clone());
        Ok(Some(updated))
    }
}
