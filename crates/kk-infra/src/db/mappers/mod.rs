pub mod history_mapper;

pub use history_mapper::HistoryRowMapper;
