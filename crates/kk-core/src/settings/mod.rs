mod defaults;
pub mod model;
pub mod version;

pub use model::{Settings, CURRENT_SCHEMA_VERSION, SUPPORTED_LANGUAGES};
pub use version::SettingsVersion;
