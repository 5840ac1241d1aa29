//! ID type wrappers for type safety.

mod history_id;
mod id_macro;

pub use history_id::HistoryId;
