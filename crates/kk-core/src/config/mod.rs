//! Pure data mapping of the optional `kaikanakku.toml` file.
//!
//! No validation and no default resolution happens here. Empty paths and zero numbers
//! are valid facts; the binary decides what they mean.

use std::path::PathBuf;

/// Application configuration DTO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file. Empty means "use the app data directory".
    pub database_path: PathBuf,

    /// User settings JSON file. Empty means "use the app data directory".
    pub settings_path: PathBuf,

    /// Directory for rolling log files.
    pub logs_dir: PathBuf,

    /// Size of the recent-history strip. `0` means unset.
    pub recent_limit: u32,

    /// Retention sweep period in hours. `0` means unset.
    pub retention_period_hours: u64,

    /// Base delay before retrying a failed sweep, in seconds. `0` means unset.
    pub retention_retry_base_secs: u64,
}

impl AppConfig {
    /// Maps a parsed TOML document. Missing keys become empty values.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            database_path: path_at(toml_value, "storage", "database_path"),
            settings_path: path_at(toml_value, "storage", "settings_path"),
            logs_dir: path_at(toml_value, "logging", "logs_dir"),
            recent_limit: int_at(toml_value, "history", "recent_limit") as u32,
            retention_period_hours: int_at(toml_value, "retention", "period_hours"),
            retention_retry_base_secs: int_at(toml_value, "retention", "retry_base_secs"),
        })
    }

    pub fn empty() -> Self {
        Self {
            database_path: PathBuf::new(),
            settings_path: PathBuf::new(),
            logs_dir: PathBuf::new(),
            recent_limit: 0,
            retention_period_hours: 0,
            retention_retry_base_secs: 0,
        }
    }

    /// Builds every path under `data_dir`.
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("kaikanakku.db"),
            settings_path: data_dir.join("settings.json"),
            logs_dir: data_dir.join("logs"),
            ..Self::empty()
        }
    }
}

fn path_at(value: &toml::Value, section: &str, key: &str) -> PathBuf {
    PathBuf::from(
        value
            .get(section)
            .and_then(|s| s.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or(""),
    )
}

// Negative integers are clamped to zero, the "unset" value.
fn int_at(value: &toml::Value, section: &str, key: &str) -> u64 {
    value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
        .unwrap_or(0)
        .max(0) as u64
}
