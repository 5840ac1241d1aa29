use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, ensure, Context};
use tokio::task::AbortHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, info, warn, Instrument};

use kk_core::ports::{JobOutcome, PeriodicJob, SchedulerPort};

/// Runs named periodic jobs on the tokio runtime.
///
/// Each job gets one task that runs it immediately and then once per period.
/// Missed ticks are skipped rather than replayed. A job answering
/// [`JobOutcome::Retry`] is re-run with exponential backoff, capped at its period.
pub struct TokioScheduler {
    jobs: Arc<Mutex<HashMap<String, AbortHandle>>>,
    retry_base: Duration,
}

impl TokioScheduler {
    pub fn new(retry_base: Duration) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
            retry_base,
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.jobs
            .lock()
            .map(|jobs| jobs.contains_key(name))
            .unwrap_or(false)
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        if let Ok(jobs) = self.jobs.lock() {
            for handle in jobs.values() {
                handle.abort();
            }
        }
    }
}

/// `base * 2^attempt`, never longer than `cap`.
fn backoff_delay(base: Duration, attempt: u32, cap: Duration) -> Duration {
    base.checked_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
        .unwrap_or(cap)
        .min(cap)
}

async fn run_periodic(
    name: String,
    period: Duration,
    retry_base: Duration,
    job: Arc<dyn PeriodicJob>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let mut attempt = 0u32;
        loop {
            match job.run().await {
                JobOutcome::Success => {
                    debug!(job = %name, "job run succeeded");
                    break;
                }
                JobOutcome::Retry => {
                    let delay = backoff_delay(retry_base, attempt, period);
                    if delay >= period {
                        warn!(job = %name, attempt, "job still failing, waiting for next period");
                        break;
                    }
                    warn!(job = %name, attempt, delay_ms = delay.as_millis() as u64, "job asked for retry");
                    attempt += 1;
                    sleep(delay).await;
                }
            }
        }
    }
}

impl SchedulerPort for TokioScheduler {
    fn register_periodic(
        &self,
        name: &str,
        period: Duration,
        job: Arc<dyn PeriodicJob>,
    ) -> anyhow::Result<bool> {
        ensure!(!period.is_zero(), "job {name} registered with a zero period");
        let runtime =
            tokio::runtime::Handle::try_current().context("scheduler requires a tokio runtime")?;

        let mut jobs = self
            .jobs
            .lock()
            .map_err(|_| anyhow!("scheduler registry lock poisoned"))?;
        if jobs.contains_key(name) {
            debug!(job = %name, "job already registered, keeping existing");
            return Ok(false);
        }

        let span = tracing::info_span!("scheduler.job", job = %name);
        let task = runtime.spawn(
            run_periodic(name.to_string(), period, self.retry_base, job).instrument(span),
        );
        jobs.insert(name.to_string(), task.abort_handle());
        info!(job = %name, period_secs = period.as_secs(), "job registered");
        Ok(true)
    }

    fn cancel(&self, name: &str) -> bool {
        let Ok(mut jobs) = self.jobs.lock() else {
            return false;
        };
        match jobs.remove(name) {
            Some(handle) => {
                handle.abort();
                info!(job = %name, "job cancelled");
                true
            }
            None => false,
        }
    }
}
