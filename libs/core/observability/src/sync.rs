//! Metrics for catalog → index sync runs.

use metrics::{counter, gauge, histogram};
use std::time::{SystemTime, UNIX_EPOCH};

/// Sync run metrics recorder
pub struct SyncMetrics;

impl SyncMetrics {
    /// Record a finished run.
    ///
    /// `status` is the run's final status label (`success`, `partial`, `failed`).
    pub fn record_run(status: &str, processed: usize, failed: usize, duration_secs: f64) {
        counter!("sync_runs_total", "status" => status.to_string()).increment(1);

        counter!("sync_products_total", "outcome" => "processed").increment(processed as u64);
        counter!("sync_products_total", "outcome" => "failed").increment(failed as u64);

        histogram!("sync_run_duration_seconds", "status" => status.to_string())
            .record(duration_secs);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        gauge!("sync_last_run_timestamp_seconds").set(now);

        tracing::debug!(
            status = status,
            processed = processed,
            failed = failed,
            duration_secs = duration_secs,
            "Sync run metrics recorded"
        );
    }

    /// Record a run rejected before it started (bad batch size).
    pub fn record_rejected(reason: &str) {
        counter!("sync_runs_total", "status" => "rejected", "reason" => reason.to_string())
            .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        SyncMetrics::record_run("partial", 10, 2, 1.25);
        SyncMetrics::record_rejected("invalid_batch_size");
    }
}
