use crate::harness::accumulator::ResultAccumulator;
use crate::harness::error::{HarnessError, HarnessResult};
use crate::harness::executor::RequestExecutor;
use crate::harness::types::{CancelToken, LoadTestConfig, Strategy};
use crate::metrics::{record_attempt, record_run_complete};
use crate::report::RunReport;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// A validated load test, ready to run against its target.
pub struct LoadTest {
    config: LoadTestConfig,
    executor: Arc<RequestExecutor>,
    cancel: CancelToken,
}

impl LoadTest {
    /// Validate `config` and prepare the HTTP client. No request is sent.
    pub fn new(config: LoadTestConfig) -> HarnessResult<Self> {
        let executor = RequestExecutor::new(&config)?;
        Ok(Self {
            config,
            executor: Arc::new(executor),
            cancel: CancelToken::new(),
        })
    }

    /// Use an externally owned cancel token, e.g. one shared by several runs.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &LoadTestConfig {
        &self.config
    }

    /// Token that stops dispatching new attempts for this load test.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Fire `total_requests` attempts using `strategy` and report on them.
    ///
    /// Target failures never make this return an error; only invalid
    /// settings or a crashed worker do.
    pub async fn run(&self, strategy: &Strategy) -> HarnessResult<RunReport> {
        strategy.validate()?;

        let run_id = uuid::Uuid::new_v4().to_string();
        let total = self.config.total_requests;
        let accumulator = Arc::new(ResultAccumulator::new());

        tracing::info!(
            %run_id,
            label = %self.config.label.trim(),
            target = %self.config.target_url,
            %strategy,
            total_requests = total,
            "starting load test"
        );

        let attempt = {
            let executor = self.executor.clone();
            let accumulator = accumulator.clone();
            move || {
                let executor = executor.clone();
                let accumulator = accumulator.clone();
                async move {
                    let sent = Instant::now();
                    let outcome = executor.execute().await;
                    record_attempt(outcome, sent.elapsed());
                    accumulator.record(outcome);
                }
            }
        };

        let started_at = Utc::now();
        let start = Instant::now();
        let summary = strategy.dispatch(total, attempt, &self.cancel).await?;
        let elapsed = start.elapsed();

        let counts = accumulator.snapshot();
        if counts.completed() != summary.dispatched || summary.dispatched + summary.skipped != total
        {
            tracing::error!(
                %run_id,
                expected = total,
                recorded = counts.completed(),
                skipped = summary.skipped,
                "outcome accounting does not add up"
            );
            return Err(HarnessError::AccountingMismatch {
                expected: total,
                recorded: counts.completed() + summary.skipped,
            });
        }

        let report = RunReport::new(
            run_id,
            self.config.label.clone(),
            self.config.target_url.clone(),
            strategy.name().to_string(),
            started_at,
            total,
            counts,
            summary.skipped,
            elapsed,
        );
        record_run_complete(&report);

        tracing::info!(
            run_id = %report.run_id,
            success = report.success_count,
            not_found = report.not_found_count,
            other_failure = report.other_failure_count,
            skipped = report.skipped_count,
            duration_ms = report.duration_millis,
            requests_per_second = report.requests_per_second,
            "load test finished"
        );

        Ok(report)
    }
}

/// Validate, build and run a load test in one call.
pub async fn run_load_test(config: LoadTestConfig, strategy: &Strategy) -> HarnessResult<RunReport> {
    LoadTest::new(config)?.run(strategy).await
}
