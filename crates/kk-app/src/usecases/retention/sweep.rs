use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};

use kk_core::ports::{
    ClockPort, HistoryRepositoryPort, JobOutcome, PeriodicJob, SchedulerPort, SettingsPort,
};

pub const DAY_MS: i64 = 86_400_000;

pub const RETENTION_JOB_NAME: &str = "auto_delete_history";

/// Cutoff for a sweep at `now_ms`. `None` when retention is disabled (`days <= 0`).
pub fn retention_cutoff_ms(now_ms: i64, days: i32) -> Option<i64> {
    if days <= 0 {
        return None;
    }
    Some(now_ms.saturating_sub(i64::from(days).saturating_mul(DAY_MS)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SweepOutcome {
    Disabled,
    Swept { cutoff_ms: i64, deleted: usize },
}

#[derive(Debug, Error)]
pub enum RetentionError {
    #[error("failed to read settings")]
    Settings(#[source] anyhow::Error),

    #[error("failed to delete expired history")]
    Store(#[source] anyhow::Error),
}

/// One retention pass.
///
/// Settings are read from the port on every run so a long-running daemon picks up
/// changes made by other processes.
pub struct SweepExpiredHistory {
    settings: Arc<dyn SettingsPort>,
    repo: Arc<dyn HistoryRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl SweepExpiredHistory {
    pub fn new(
        settings: Arc<dyn SettingsPort>,
        repo: Arc<dyn HistoryRepositoryPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            settings,
            repo,
            clock,
        }
    }

    pub async fn execute(&self) -> Result<SweepOutcome, RetentionError> {
        let span = info_span!("usecase.sweep_expired_history.execute");

        async {
            let settings = self
                .settings
                .load()
                .await
                .map_err(RetentionError::Settings)?;

            let cutoff = retention_cutoff_ms(self.clock.now_ms(), settings.auto_delete_days);
            let Some(cutoff_ms) = cutoff else {
                info!(days = settings.auto_delete_days, "history retention disabled");
                return Ok(SweepOutcome::Disabled);
            };

            let deleted = self
                .repo
                .delete_older_than(cutoff_ms)
                .await
                .map_err(RetentionError::Store)?;

            info!(
                days = settings.auto_delete_days,
                cutoff_ms, deleted, "expired history swept"
            );
            Ok(SweepOutcome::Swept { cutoff_ms, deleted })
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl PeriodicJob for SweepExpiredHistory {
    async fn run(&self) -> JobOutcome {
        match self.execute().await {
            Ok(_) => JobOutcome::Success,
            Err(e) => {
                warn!(error = ?e, "retention sweep failed, will retry");
                JobOutcome::Retry
            }
        }
    }
}

/// Registers the sweep under [`RETENTION_JOB_NAME`]. A job already registered
/// under that name keeps running and `false` is returned.
pub fn schedule_retention(
    scheduler: &dyn SchedulerPort,
    sweep: Arc<SweepExpiredHistory>,
    period: Duration,
) -> anyhow::Result<bool> {
    let registered = scheduler.register_periodic(RETENTION_JOB_NAME, period, sweep)?;
    if registered {
        info!(period_secs = period.as_secs(), "retention sweep scheduled");
    } else {
        info!("retention sweep already scheduled, keeping existing job");
    }
    Ok(registered)
}
