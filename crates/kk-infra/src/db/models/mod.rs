mod history_row;

pub use history_row::HistoryRow;
