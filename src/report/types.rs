use crate::harness::OutcomeCounts;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Read-only result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub label: String,
    pub target_url: String,
    pub strategy: String,
    pub started_at: DateTime<Utc>,
    pub total_requests: u64,
    pub duration_millis: u64,
    pub success_count: u64,
    pub not_found_count: u64,
    pub other_failure_count: u64,
    /// Attempts never dispatched because the run was cancelled
    pub skipped_count: u64,
    pub requests_per_second: f64,
}

impl RunReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        run_id: String,
        label: String,
        target_url: String,
        strategy: String,
        started_at: DateTime<Utc>,
        total_requests: u64,
        counts: OutcomeCounts,
        skipped: u64,
        elapsed: Duration,
    ) -> Self {
        let duration_millis = elapsed.as_millis() as u64;
        Self {
            run_id,
            label,
            target_url,
            strategy,
            started_at,
            total_requests,
            duration_millis,
            success_count: counts.success,
            not_found_count: counts.not_found,
            other_failure_count: counts.other_failure,
            skipped_count: skipped,
            requests_per_second: requests_per_second(counts.success, duration_millis),
        }
    }

    pub fn counts(&self) -> OutcomeCounts {
        OutcomeCounts {
            success: self.success_count,
            not_found: self.not_found_count,
            other_failure: self.other_failure_count,
        }
    }

    pub fn completed(&self) -> u64 {
        self.counts().completed()
    }

    pub fn has_failures(&self) -> bool {
        self.counts().failures() > 0
    }

    pub fn was_cancelled(&self) -> bool {
        self.skipped_count > 0
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_millis)
    }

    /// Throughput rounded to the nearest whole request.
    pub fn rounded_requests_per_second(&self) -> u64 {
        self.requests_per_second.round() as u64
    }
}

/// Successful requests per second over a whole-millisecond duration.
///
/// A zero duration is treated as one millisecond, so the rate is finite and
/// only zero when nothing succeeded.
pub fn requests_per_second(success: u64, duration_millis: u64) -> f64 {
    if success == 0 {
        return 0.0;
    }
    success as f64 * 1000.0 / duration_millis.max(1) as f64
}
