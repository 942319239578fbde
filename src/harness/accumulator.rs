use crate::harness::types::{Outcome, OutcomeCounts};
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free outcome counters shared by every attempt of one run.
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    success: AtomicU64,
    not_found: AtomicU64,
    other_failure: AtomicU64,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one resolved attempt.
    pub fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Success => &self.success,
            Outcome::NotFound => &self.not_found,
            Outcome::OtherFailure => &self.other_failure,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> OutcomeCounts {
        OutcomeCounts {
            success: self.success.load(Ordering::Acquire),
            not_found: self.not_found.load(Ordering::Acquire),
            other_failure: self.other_failure.load(Ordering::Acquire),
        }
    }

    pub fn completed(&self) -> u64 {
        self.snapshot().completed()
    }
}
