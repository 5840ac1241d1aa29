use tracing::info;

use super::writer::HistoryWriter;

pub struct ClearHistory {
    writer: HistoryWriter,
}

impl ClearHistory {
    pub fn new(writer: HistoryWriter) -> Self {
        Self { writer }
    }

    pub fn execute(&self) {
        info!("clearing history");
        self.writer.clear();
    }
}
