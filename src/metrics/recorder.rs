//! Metric recording for load-test runs.
//!
//! Individual attempts only ever touch aggregate series; no label carries a
//! per-request value.

use crate::harness::Outcome;
use crate::report::RunReport;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return; // Already initialized
    }

    describe_counter!(
        "hammer_requests_total",
        "Request attempts by outcome (success, not_found, other_failure)"
    );
    describe_histogram!(
        "hammer_request_duration_seconds",
        "Time from sending a request to classifying its outcome"
    );
    describe_counter!("hammer_runs_completed_total", "Load-test runs that finished");
    describe_counter!(
        "hammer_requests_skipped_total",
        "Attempts never dispatched because a run was cancelled"
    );
    describe_gauge!(
        "hammer_run_requests_per_second",
        "Successful requests per second of the most recent run"
    );
}

/// Record one resolved attempt
pub fn record_attempt(outcome: Outcome, elapsed: Duration) {
    counter!("hammer_requests_total", "outcome" => outcome.as_str()).increment(1);
    histogram!("hammer_request_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record the end of a run
pub fn record_run_complete(report: &RunReport) {
    counter!("hammer_runs_completed_total", "strategy" => report.strategy.clone()).increment(1);
    if report.skipped_count > 0 {
        counter!("hammer_requests_skipped_total").increment(report.skipped_count);
    }
    gauge!("hammer_run_requests_per_second", "label" => report.label.trim().to_string())
        .set(report.requests_per_second);
}
