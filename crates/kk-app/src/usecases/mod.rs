pub mod conversion;
pub mod history;
pub mod retention;
pub mod settings;
