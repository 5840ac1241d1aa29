use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, Instrument};

use kk_core::ports::{HistoryRepositoryPort, InsertOutcome};
use kk_core::{HistoryId, HistoryRecord, NewHistoryRecord};

enum WriteCommand {
    Insert(NewHistoryRecord),
    Update(HistoryRecord),
    Delete(HistoryId),
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget handle to the single history write worker.
///
/// Writes are queued in submission order and applied one at a time, so two writes
/// to the same record can never interleave. Callers never see store failures; the
/// worker logs them.
#[derive(Clone)]
pub struct HistoryWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl HistoryWriter {
    /// Spawns the worker on the current runtime. It exits once every handle is dropped.
    pub fn spawn(repo: Arc<dyn HistoryRepositoryPort>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let span = tracing::info_span!("history.writer");
        let handle = tokio::spawn(run_worker(repo, rx).instrument(span));
        (Self { tx }, handle)
    }

    pub fn insert(&self, record: NewHistoryRecord) {
        self.submit(WriteCommand::Insert(record));
    }

    /// Overwrites an existing record. A record deleted in the meantime stays deleted.
    pub fn update(&self, record: HistoryRecord) {
        self.submit(WriteCommand::Update(record));
    }

    pub fn delete(&self, id: HistoryId) {
        self.submit(WriteCommand::Delete(id));
    }

    pub fn clear(&self) {
        self.submit(WriteCommand::Clear);
    }

    /// Resolves once every write submitted before this call has been applied.
    pub async fn flush(&self) -> anyhow::Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(WriteCommand::Flush(done_tx))
            .map_err(|_| anyhow!("history writer has stopped"))?;
        done_rx
            .await
            .map_err(|_| anyhow!("history writer stopped before flushing"))
    }

    fn submit(&self, command: WriteCommand) {
        if self.tx.send(command).is_err() {
            error!("history writer has stopped, dropping write");
        }
    }
}

async fn run_worker(
    repo: Arc<dyn HistoryRepositoryPort>,
    mut rx: mpsc::UnboundedReceiver<WriteCommand>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Insert(record) => match repo.insert(record).await {
                Ok(InsertOutcome::Inserted(stored)) => {
                    debug!(id = %stored.id, "history record inserted");
                }
                Ok(InsertOutcome::Duplicate) => debug!("history record already present"),
                Err(e) => error!(error = %e, "failed to insert history record"),
            },
            WriteCommand::Update(record) => match repo.update(&record).await {
                Ok(true) => debug!(id = %record.id, "history record updated"),
                Ok(false) => debug!(id = %record.id, "history record gone, update skipped"),
                Err(e) => error!(id = %record.id, error = %e, "failed to update history record"),
            },
            WriteCommand::Delete(id) => match repo.delete(&id).await {
                Ok(found) => debug!(id = %id, found, "history record delete applied"),
                Err(e) => error!(id = %id, error = %e, "failed to delete history record"),
            },
            WriteCommand::Clear => match repo.delete_all().await {
                Ok(deleted) => debug!(deleted, "history cleared"),
                Err(e) => error!(error = %e, "failed to clear history"),
            },
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("history writer stopped");
}
