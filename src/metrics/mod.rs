//! Metrics and observability module
//!
//! Prometheus-compatible aggregates for load-test runs. Recording is a
//! no-op until a recorder is installed, e.g. with [`start_metrics_server`].
//!
//! Key metrics exposed:
//! - Attempts by outcome
//! - Per-attempt latency
//! - Completed runs and their throughput

pub mod exporter;
pub mod recorder;

pub use exporter::{render_metrics, start_metrics_server, MetricsConfig, MetricsError};
pub use recorder::{init_metrics, record_attempt, record_run_complete};
