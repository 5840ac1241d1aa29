//! History use cases: the write worker, live queries and list maintenance.

mod clear_history;
mod composer;
mod delete_record;
mod list_history;
mod list_recent;
mod live_query;
mod reuse_record;
mod toggle_favorite;
mod writer;

pub use clear_history::ClearHistory;
pub use composer::HistoryQueryComposer;
pub use delete_record::DeleteHistoryRecord;
pub use list_history::ListHistory;
pub use list_recent::ListRecentHistory;
pub use live_query::{run_live_query, LiveQuery};
pub use reuse_record::ReuseHistoryRecord;
pub use toggle_favorite::ToggleFavorite;
pub use writer::HistoryWriter;
