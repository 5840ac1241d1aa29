//! Retention: deletes history records older than the configured number of days.

mod sweep;

pub use sweep::{
    retention_cutoff_ms, schedule_retention, RetentionError, SweepExpiredHistory, SweepOutcome,
    DAY_MS, RETENTION_JOB_NAME,
};
