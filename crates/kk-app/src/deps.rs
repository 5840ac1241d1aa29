//! Dependency grouping for [`App`](crate::App) construction.
//!
//! Plain parameter grouping: no build steps, no defaults, no hidden logic.

use std::sync::Arc;

use kk_core::ports::*;

/// Every port the application needs. All fields are required.
pub struct AppDeps {
    pub history_repo: Arc<dyn HistoryRepositoryPort>,
    pub settings: Arc<dyn SettingsPort>,
    pub clock: Arc<dyn ClockPort>,
    pub scheduler: Arc<dyn SchedulerPort>,
}
