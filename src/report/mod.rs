//! End-of-run summary: counts, timing and throughput.

pub mod render;
pub mod types;

pub use render::{format_elapsed, run_banner};
pub use types::{requests_per_second, RunReport};
