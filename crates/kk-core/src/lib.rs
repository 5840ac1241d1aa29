//! # kk-core
//!
//! Core domain models and business logic for KaiKanakku.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the Kol/Viral/cm conversion engine, measurement arithmetic, the history model and
//! the port traits implemented by `kk-infra`.

// Public module exports
pub mod app_dirs;
pub mod config;
pub mod history;
pub mod ids;
pub mod measure;
pub mod ports;
pub mod settings;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use history::{
    HistoryFilter, HistoryQuery, HistoryRecord, NewHistoryRecord, ReuseTarget, SortOrder,
};
pub use ids::HistoryId;
pub use measure::{DisplayPolicy, InputError, InputField, Measurement, RoundingMode};
pub use settings::model::Settings;
