use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::warn;

use kk_core::ports::HistoryRepositoryPort;
use kk_core::{HistoryQuery, HistoryRecord};

/// Runs `query` now and again after every store change, handing each result to `emit`.
///
/// Returns when `emit` answers `false` or the store stops publishing changes. A failed
/// query is logged and retried on the next change.
pub async fn run_live_query<F>(repo: Arc<dyn HistoryRepositoryPort>, query: HistoryQuery, mut emit: F)
where
    F: FnMut(Vec<HistoryRecord>) -> bool,
{
    let mut changes = repo.changes();
    loop {
        changes.borrow_and_update();
        match repo.query(&query).await {
            Ok(records) => {
                if !emit(records) {
                    return;
                }
            }
            Err(e) => warn!(query = ?query, error = %e, "live history query failed"),
        }
        if changes.changed().await.is_err() {
            return;
        }
    }
}

/// A live query running on its own task. Dropping it stops the task.
pub struct LiveQuery {
    rx: watch::Receiver<Vec<HistoryRecord>>,
    task: AbortHandle,
}

impl LiveQuery {
    pub fn spawn(repo: Arc<dyn HistoryRepositoryPort>, query: HistoryQuery) -> Self {
        let (tx, rx) = watch::channel(Vec::new());
        let task = tokio::spawn(run_live_query(repo, query, move |records| {
            tx.send(records).is_ok()
        }));
        Self {
            rx,
            task: task.abort_handle(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<HistoryRecord>> {
        self.rx.clone()
    }

    /// Waits for the next emission and returns it.
    pub async fn next(&mut self) -> Option<Vec<HistoryRecord>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

impl Drop for LiveQuery {
    fn drop(&mut self) {
        self.task.abort();
    }
}
