use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use kk_core::ports::{HistoryRepositoryPort, InsertOutcome};
use kk_core::{HistoryId, HistoryQuery, HistoryRecord, NewHistoryRecord};

/// Volatile history store used by `--in-memory` runs and tests.
///
/// Mirrors the SQLite store: duplicate (input, output) pairs are ignored and every
/// change bumps the revision.
pub struct InMemoryHistoryRepository {
    records: RwLock<Vec<HistoryRecord>>,
    revision: watch::Sender<u64>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            records: RwLock::new(Vec::new()),
            revision,
        }
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for InMemoryHistoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryRepositoryPort for InMemoryHistoryRepository {
    async fn insert(&self, record: NewHistoryRecord) -> anyhow::Result<InsertOutcome> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|r| r.same_content(&record.input_text, &record.output_text))
        {
            debug!(input = %record.input_text, "duplicate history record ignored");
            return Ok(InsertOutcome::Duplicate);
        }

        let stored = record.into_record(HistoryId::new());
        records.push(stored.clone());
        drop(records);

        self.bump_revision();
        Ok(InsertOutcome::Inserted(stored))
    }

    async fn update(&self, record: &HistoryRecord) -> anyhow::Result<bool> {
        let mut records = self.records.write().await;
        let Some(existing) = records.iter_mut().find(|r| r.id == record.id) else {
            return Ok(false);
        };
        *existing = record.clone();
        drop(records);

        self.bump_revision();
        Ok(true)
    }

    async fn delete(&self, id: &HistoryId) -> anyhow::Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| &r.id != id);
        let removed = records.len() != before;
        drop(records);

        if removed {
            self.bump_revision();
        }
        Ok(removed)
    }

    async fn delete_all(&self) -> anyhow::Result<usize> {
        let removed = std::mem::take(&mut *self.records.write().await).len();
        if removed > 0 {
            self.bump_revision();
        }
        Ok(removed)
    }

    async fn delete_older_than(&self, cutoff_ms: i64) -> anyhow::Result<usize> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !r.is_older_than(cutoff_ms));
        let removed = before - records.len();
        drop(records);

        if removed > 0 {
            self.bump_revision();
        }
        Ok(removed)
    }

    async fn get(&self, id: &HistoryId) -> anyhow::Result<Option<HistoryRecord>> {
        Ok(self.records.read().await.iter().find(|r| &r.id == id).cloned())
    }

    async fn query(&self, query: &HistoryQuery) -> anyhow::Result<Vec<HistoryRecord>> {
        Ok(query.apply(self.records.read().await.iter()))
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicates_are_suppressed() {
        let repo = InMemoryHistoryRepository::new();
        let first = repo
            .insert(NewHistoryRecord::new("1 kol", "72.00 cm", 72.0, 1))
            .await
            .unwrap();
        assert!(matches!(first, InsertOutcome::Inserted(_)));

        let second = repo
            .insert(NewHistoryRecord::new("1 kol", "72.00 cm", 72.0, 2))
            .await
            .unwrap();
        assert_eq!(second, InsertOutcome::Duplicate);
        assert_eq!(repo.query(&HistoryQuery::Recent(10)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_never_resurrects_deleted_record() {
        let repo = InMemoryHistoryRepository::new();
        let InsertOutcome::Inserted(record) = repo
            .insert(NewHistoryRecord::new("1 kol", "72.00 cm", 72.0, 1))
            .await
            .unwrap()
        else {
            panic!("expected insert");
        };

        assert!(repo.delete(&record.id).await.unwrap());
        assert!(!repo.update(&record.clone().with_favorite(true)).await.unwrap());
        assert!(repo.get(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mutations_bump_revision_only_when_rows_change() {
        let repo = InMemoryHistoryRepository::new();
        let rx = repo.changes();
        assert_eq!(*rx.borrow(), 0);

        repo.insert(NewHistoryRecord::new("a", "b", 1.0, 1))
            .await
            .unwrap();
        assert_eq!(*rx.borrow(), 1);

        assert_eq!(repo.delete_older_than(0).await.unwrap(), 0);
        assert_eq!(*rx.borrow(), 1);

        assert_eq!(repo.delete_all().await.unwrap(), 1);
        assert_eq!(*rx.borrow(), 2);
    }
}
