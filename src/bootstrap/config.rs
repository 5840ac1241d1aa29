//! # Configuration Loader / 配置加载器
//!
//! `load_config` is pure data loading: whatever the TOML file says becomes an
//! [`AppConfig`]. `resolve_config` is the one place where empty values are turned
//! into concrete paths and numbers for this run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use kk_core::config::AppConfig;
use kk_core::history::RECENT_HISTORY_LIMIT;
use kk_core::ports::{AppDirsPort, DAILY_PERIOD};
use kk_infra::fs::DirsAppDirsAdapter;

/// Looked up in the data directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "kaikanakku.toml";

const DEFAULT_RETRY_BASE: Duration = Duration::from_secs(60);

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Concrete settings for one run, with every empty value resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub settings_path: PathBuf,
    pub logs_dir: PathBuf,
    pub recent_limit: usize,
    pub retention_period: Duration,
    pub retention_retry_base: Duration,
}

/// Resolves the data directory (explicit override, or the platform data dir) and
/// loads the config file.
///
/// An explicit `config_path` must exist. Without one, `kaikanakku.toml` in the data
/// directory is used when present.
pub fn load_runtime_config(
    config_path: Option<&Path>,
    data_dir: Option<&Path>,
) -> anyhow::Result<RuntimeConfig> {
    let data_dir = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => {
            DirsAppDirsAdapter::new()
                .get_app_dirs()
                .context("Failed to resolve application data directory")?
                .app_data_root
        }
    };

    let config = match config_path {
        Some(path) => load_config(path)?,
        None => {
            let default_path = data_dir.join(CONFIG_FILE_NAME);
            if default_path.is_file() {
                load_config(&default_path)?
            } else {
                AppConfig::empty()
            }
        }
    };

    Ok(resolve_config(config, data_dir))
}

/// Fills every empty value in `config` from the system defaults under `data_dir`.
pub fn resolve_config(config: AppConfig, data_dir: PathBuf) -> RuntimeConfig {
    let defaults = AppConfig::with_system_defaults(data_dir.clone());
    let or_default = |value: PathBuf, default: PathBuf| {
        if value.as_os_str().is_empty() {
            default
        } else {
            value
        }
    };

    RuntimeConfig {
        database_path: or_default(config.database_path, defaults.database_path),
        settings_path: or_default(config.settings_path, defaults.settings_path),
        logs_dir: or_default(config.logs_dir, defaults.logs_dir),
        recent_limit: match config.recent_limit {
            0 => RECENT_HISTORY_LIMIT,
            n => n as usize,
        },
        retention_period: match config.retention_period_hours {
            0 => DAILY_PERIOD,
            hours => Duration::from_secs(hours.saturating_mul(3600)),
        },
        retention_retry_base: match config.retention_retry_base_secs {
            0 => DEFAULT_RETRY_BASE,
            secs => Duration::from_secs(secs),
        },
        data_dir,
    }
}
