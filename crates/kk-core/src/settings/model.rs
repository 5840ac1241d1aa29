use serde::{Deserialize, Serialize};

use crate::measure::{DisplayPolicy, RoundingMode};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// UI languages the settings screen offers.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "ta"];

/// User preferences persisted as `settings.json`.
///
/// Every field falls back to its default when missing from the file, so older or
/// hand-edited files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schema_version: u32,

    /// Keep fractional centimeters in cm → kol output.
    pub precision_enabled: bool,

    /// Applied when precision is disabled.
    pub rounding_mode: RoundingMode,

    /// Records older than this many days are swept. `0` or less disables the sweep.
    pub auto_delete_days: i32,

    pub language: String,

    /// Which converter direction the app opens on.
    pub cm_to_kol_default: bool,
}

impl Settings {
    pub fn display_policy(&self) -> DisplayPolicy {
        DisplayPolicy::new(self.precision_enabled, self.rounding_mode)
    }

    pub fn is_supported_language(language: &str) -> bool {
        SUPPORTED_LANGUAGES.contains(&language)
    }
}
