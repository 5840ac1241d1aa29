use tracing::info;

use kk_core::HistoryId;

use super::writer::HistoryWriter;

pub struct DeleteHistoryRecord {
    writer: HistoryWriter,
}

impl DeleteHistoryRecord {
    pub fn new(writer: HistoryWriter) -> Self {
        Self { writer }
    }

    pub fn execute(&self, id: HistoryId) {
        info!(id = %id, "deleting history record");
        self.writer.delete(id);
    }
}
