use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub const DAILY_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// What a job asks the scheduler to do after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    /// Run again after a backoff delay instead of waiting for the next period.
    Retry,
}

#[async_trait]
pub trait PeriodicJob: Send + Sync {
    async fn run(&self) -> JobOutcome;
}

/// Named background jobs.
pub trait SchedulerPort: Send + Sync {
    /// Starts `job` now and then once per `period`.
    ///
    /// Returns `false` and leaves the running job untouched when `name` is
    /// already registered.
    fn register_periodic(
        &self,
        name: &str,
        period: Duration,
        job: Arc<dyn PeriodicJob>,
    ) -> anyhow::Result<bool>;

    fn register_daily(&self, name: &str, job: Arc<dyn PeriodicJob>) -> anyhow::Result<bool> {
        self.register_periodic(name, DAILY_PERIOD, job)
    }

    /// Stops a job. Returns `false` if no job had that name.
    fn cancel(&self, name: &str) -> bool;
}
