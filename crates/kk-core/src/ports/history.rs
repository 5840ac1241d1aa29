use async_trait::async_trait;
use tokio::sync::watch;

use crate::history::{HistoryQuery, HistoryRecord, NewHistoryRecord};
use crate::ids::HistoryId;

/// Result of inserting a record into the history store.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(HistoryRecord),
    /// A record with the same input and output text already exists; nothing was written.
    Duplicate,
}

/// Persistent history store.
///
/// Every call that changes rows bumps the revision published by [`changes`], which
/// is what live queries re-run on.
///
/// [`changes`]: HistoryRepositoryPort::changes
#[async_trait]
pub trait HistoryRepositoryPort: Send + Sync {
    /// Inserts unless an identical (input, output) pair exists.
    async fn insert(&self, record: NewHistoryRecord) -> anyhow::Result<InsertOutcome>;

    /// Overwrites an existing record. Never creates one: returns `false` when the
    /// id is gone.
    async fn update(&self, record: &HistoryRecord) -> anyhow::Result<bool>;

    async fn delete(&self, id: &HistoryId) -> anyhow::Result<bool>;

    async fn delete_all(&self) -> anyhow::Result<usize>;

    /// Deletes records with `timestamp_ms < cutoff_ms`.
    async fn delete_older_than(&self, cutoff_ms: i64) -> anyhow::Result<usize>;

    async fn get(&self, id: &HistoryId) -> anyhow::Result<Option<HistoryRecord>>;

    async fn query(&self, query: &HistoryQuery) -> anyhow::Result<Vec<HistoryRecord>>;

    fn changes(&self) -> watch::Receiver<u64>;
}
