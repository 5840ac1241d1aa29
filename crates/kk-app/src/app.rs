use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::info;

use kk_core::history::RECENT_HISTORY_LIMIT;
use kk_core::HistoryFilter;

use crate::usecases::conversion::{Calculate, ConvertCmToKol, ConvertKolToCm};
use crate::usecases::history::{
    ClearHistory, DeleteHistoryRecord, HistoryQueryComposer, HistoryWriter, ListHistory,
    ListRecentHistory, ReuseHistoryRecord, ToggleFavorite,
};
use crate::usecases::retention::{schedule_retention, SweepExpiredHistory, RETENTION_JOB_NAME};
use crate::usecases::settings::{GetSettings, ResetSettings, SettingsStore, UpdateSettings};
use crate::AppDeps;

/// The application runtime.
///
/// Owns the ports, the settings cache and the history write worker. Use cases are
/// built on demand through [`App::usecases`].
pub struct App {
    deps: AppDeps,
    settings: SettingsStore,
    writer: HistoryWriter,
    writer_task: JoinHandle<()>,
    recent_limit: usize,
}

impl App {
    /// Loads settings and starts the history write worker.
    ///
    /// Must be called from inside a Tokio runtime.
    /// 必须在 Tokio 运行时内调用。
    pub async fn start(deps: AppDeps) -> Result<Self> {
        let settings = SettingsStore::load(Arc::clone(&deps.settings)).await?;
        let (writer, writer_task) = HistoryWriter::spawn(Arc::clone(&deps.history_repo));
        info!("application started");

        Ok(Self {
            deps,
            settings,
            writer,
            writer_task,
            recent_limit: RECENT_HISTORY_LIMIT,
        })
    }

    /// Overrides how many records the recent-history strip shows.
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn writer(&self) -> &HistoryWriter {
        &self.writer
    }

    pub fn usecases(&self) -> UseCases<'_> {
        UseCases { app: self }
    }

    /// Registers the retention sweep with the scheduler. Returns `false` when it
    /// was already registered.
    pub fn schedule_retention(&self, period: Duration) -> Result<bool> {
        schedule_retention(
            self.deps.scheduler.as_ref(),
            Arc::new(self.usecases().sweep_expired_history()),
            period,
        )
    }

    /// Waits for queued history writes and stops background work.
    pub async fn shutdown(self) -> Result<()> {
        self.deps.scheduler.cancel(RETENTION_JOB_NAME);
        self.writer.flush().await?;
        // Writes submitted after the flush are dropped with the worker.
        self.writer_task.abort();
        info!("application shut down");
        Ok(())
    }
}

/// Use case accessor: every method returns a use case wired from the app's ports.
pub struct UseCases<'a> {
    app: &'a App,
}

impl<'a> UseCases<'a> {
    pub fn convert_kol_to_cm(&self) -> ConvertKolToCm {
        ConvertKolToCm::new(self.app.writer.clone(), Arc::clone(&self.app.deps.clock))
    }

    pub fn convert_cm_to_kol(&self) -> ConvertCmToKol {
        ConvertCmToKol::new(
            self.app.writer.clone(),
            self.app.settings.clone(),
            Arc::clone(&self.app.deps.clock),
        )
    }

    pub fn calculate(&self) -> Calculate {
        Calculate::new(self.app.writer.clone(), Arc::clone(&self.app.deps.clock))
    }

    pub fn list_recent_history(&self) -> ListRecentHistory {
        ListRecentHistory::new(Arc::clone(&self.app.deps.history_repo), self.app.recent_limit)
    }

    pub fn list_history(&self) -> ListHistory {
        ListHistory::new(Arc::clone(&self.app.deps.history_repo))
    }

    /// Starts a live composer seeded with `filter`.
    pub fn history_composer(&self, filter: HistoryFilter) -> HistoryQueryComposer {
        HistoryQueryComposer::with_filter(Arc::clone(&self.app.deps.history_repo), filter)
    }

    pub fn toggle_favorite(&self) -> ToggleFavorite {
        ToggleFavorite::new(
            Arc::clone(&self.app.deps.history_repo),
            self.app.writer.clone(),
        )
    }

    pub fn delete_history_record(&self) -> DeleteHistoryRecord {
        DeleteHistoryRecord::new(self.app.writer.clone())
    }

    pub fn clear_history(&self) -> ClearHistory {
        ClearHistory::new(self.app.writer.clone())
    }

    pub fn reuse_history_record(&self) -> ReuseHistoryRecord {
        ReuseHistoryRecord::new(Arc::clone(&self.app.deps.history_repo))
    }

    pub fn get_settings(&self) -> GetSettings {
        GetSettings::new(self.app.settings.clone())
    }

    pub fn update_settings(&self) -> UpdateSettings {
        UpdateSettings::new(self.app.settings.clone())
    }

    pub fn reset_settings(&self) -> ResetSettings {
        ResetSettings::new(self.app.settings.clone())
    }

    pub fn sweep_expired_history(&self) -> SweepExpiredHistory {
        SweepExpiredHistory::new(
            Arc::clone(&self.app.deps.settings),
            Arc::clone(&self.app.deps.history_repo),
            Arc::clone(&self.app.deps.clock),
        )
    }
}
