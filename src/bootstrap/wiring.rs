//! # Dependency Injection / 依赖注入模块
//!
//! Creates the infra adapters and groups them into [`AppDeps`]. Assembly only:
//! no business decisions and no config validation happen here.
//!
//! This is the only place that depends on `kk-infra` and `kk-app` at the same time.

use std::path::Path;
use std::sync::Arc;

use kk_app::AppDeps;
use kk_core::ports::*;
use kk_infra::db::mappers::HistoryRowMapper;
use kk_infra::db::pool::{init_db_pool, DbPool};
use kk_infra::db::repositories::DieselHistoryRepository;
use kk_infra::db::DieselSqliteExecutor;
use kk_infra::memory::InMemoryHistoryRepository;
use kk_infra::settings::FileSettingsRepository;
use kk_infra::{SystemClock, TokioScheduler};
use tracing::info;

use super::config::RuntimeConfig;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    #[error("Settings repository initialization failed: {0}")]
    SettingsInit(String),
}

/// Which history store a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBackend {
    Sqlite,
    /// Volatile; everything is gone when the process exits.
    InMemory,
}

/// Create SQLite database connection pool
/// 创建 SQLite 数据库连接池
///
/// # Errors / 错误
///
/// Returns `WiringError::DatabaseInit` if the parent directory cannot be created,
/// the path is not valid UTF-8, or the pool or migrations fail.
fn create_db_pool(db_path: &Path) -> WiringResult<DbPool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            WiringError::DatabaseInit(format!("Failed to create DB directory: {}", e))
        })?;
    }

    let db_url = db_path
        .to_str()
        .ok_or_else(|| WiringError::DatabaseInit("Invalid database path".to_string()))?;

    init_db_pool(db_url)
        .map_err(|e| WiringError::DatabaseInit(format!("Failed to initialize DB: {:#}", e)))
}

fn create_history_repo(
    config: &RuntimeConfig,
    backend: HistoryBackend,
) -> WiringResult<Arc<dyn HistoryRepositoryPort>> {
    match backend {
        HistoryBackend::Sqlite => {
            let pool = create_db_pool(&config.database_path)?;
            info!(path = %config.database_path.display(), "using sqlite history store");
            Ok(Arc::new(DieselHistoryRepository::new(
                DieselSqliteExecutor::new(pool),
                HistoryRowMapper,
            )))
        }
        HistoryBackend::InMemory => {
            info!("using in-memory history store");
            Ok(Arc::new(InMemoryHistoryRepository::new()))
        }
    }
}

fn create_settings_repo(config: &RuntimeConfig) -> WiringResult<Arc<dyn SettingsPort>> {
    if let Some(parent) = config.settings_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            WiringError::SettingsInit(format!("Failed to create settings directory: {}", e))
        })?;
    }
    Ok(Arc::new(FileSettingsRepository::new(
        config.settings_path.clone(),
    )))
}

/// Wire every port into [`AppDeps`].
pub fn wire_dependencies(
    config: &RuntimeConfig,
    backend: HistoryBackend,
) -> WiringResult<AppDeps> {
    let history_repo = create_history_repo(config, backend)?;
    let settings = create_settings_repo(config)?;

    Ok(AppDeps {
        history_repo,
        settings,
        clock: Arc::new(SystemClock),
        scheduler: Arc::new(TokioScheduler::new(config.retention_retry_base)),
    })
}
