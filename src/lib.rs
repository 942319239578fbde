//! Concurrent HTTP load-testing harness.
//!
//! Fires a large number of GET requests at a target, each carrying an
//! oversized synthetic header, classifies every response and reports
//! throughput once all requests are done.

pub mod harness;
pub mod header;
pub mod metrics;
pub mod report;
pub mod target;
pub mod tls;

pub use harness::{run_load_test, LoadTest, LoadTestConfig, Outcome, Strategy};
pub use report::RunReport;
