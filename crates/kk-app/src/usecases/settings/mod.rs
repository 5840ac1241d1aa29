mod error;
mod get_settings;
mod reset_settings;
mod store;
mod update_settings;

pub use error::SettingsError;
pub use get_settings::GetSettings;
pub use reset_settings::ResetSettings;
pub use store::SettingsStore;
pub use update_settings::UpdateSettings;
