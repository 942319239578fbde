//! Concurrent HTTP hammering engine.
//!
//! A run fires a fixed number of GET requests at one target, classifies each
//! response into an [`Outcome`] and counts the outcomes. A [`Strategy`]
//! decides how the attempts are scheduled.

pub mod accumulator;
pub mod error;
pub mod executor;
pub mod runner;
pub mod strategy;
pub mod types;

pub use accumulator::ResultAccumulator;
pub use error::{HarnessError, HarnessResult};
pub use executor::{classify, RequestExecutor};
pub use runner::{run_load_test, LoadTest};
pub use types::{
    CancelToken, DispatchSummary, LoadTestConfig, Outcome, OutcomeCounts, Strategy,
    DEFAULT_EXPECTED_BODY, DEFAULT_POOL_WORKERS,
};
