//! History domain: persisted conversion records and the queries over them.
//! 历史记录领域模型。

mod query;
mod record;
mod reuse;

pub use query::{HistoryFilter, HistoryQuery, SortOrder, RECENT_HISTORY_LIMIT};
pub use record::{HistoryRecord, NewHistoryRecord};
pub use reuse::ReuseTarget;
