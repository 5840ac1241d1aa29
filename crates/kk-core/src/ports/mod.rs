//! Port interfaces for the application layer.
//!
//! Ports are the contract between use cases and infrastructure. The conversion
//! engine itself never touches a port; only the use cases around it do.

pub mod app_dirs;
mod clock;
pub mod errors;
pub mod history;
pub mod scheduler;
pub mod settings;

pub use app_dirs::AppDirsPort;
pub use clock::*;
pub use errors::AppDirsError;
pub use history::{HistoryRepositoryPort, InsertOutcome};
pub use scheduler::{JobOutcome, PeriodicJob, SchedulerPort, DAILY_PERIOD};
pub use settings::{SettingsMigrationPort, SettingsPort};
