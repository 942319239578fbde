use crate::report::types::RunReport;
use std::fmt;
use std::time::Duration;

/// Line printed before a run starts.
pub fn run_banner(label: &str, target_url: &str) -> String {
    format!("Thread-pool hammering of the {label}URL: {target_url} ...")
}

/// Whole seconds under a minute, otherwise minutes to two decimals.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if elapsed < Duration::from_secs(60) {
        format!("{secs} secs")
    } else {
        format!("{:.2} mins", secs as f64 / 60.0)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Successful Requests: {}", self.success_count)?;

        if self.has_failures() {
            writeln!(
                f,
                "Total Unsuccessful Requests (not 404): {}",
                self.other_failure_count
            )?;
            writeln!(f, "Total Unsuccessful Requests: (404): {}", self.not_found_count)?;
        }
        if self.was_cancelled() {
            writeln!(f, "Skipped (run cancelled): {}", self.skipped_count)?;
        }

        writeln!(f, "Total Time: {}", format_elapsed(self.duration()))?;
        write!(
            f,
            "... Requests per second: {}",
            self.rounded_requests_per_second()
        )
    }
}
