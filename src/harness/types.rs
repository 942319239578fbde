use crate::harness::error::{HarnessError, HarnessResult};
use crate::header::{synthetic_header, DEFAULT_HEADER_LEN, DEFAULT_HEADER_NAME};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Response body that marks an attempt as successful.
pub const DEFAULT_EXPECTED_BODY: &str = "Hello, world";

/// Worker count used when a pool size is not given.
pub const DEFAULT_POOL_WORKERS: usize = 10;

/// Settings for one load-test run. Not modified once the run starts.
#[derive(Debug, Clone)]
pub struct LoadTestConfig {
    pub target_url: String,
    pub total_requests: u64,
    /// Free-form tag printed with the report, e.g. "(uncranked & non SSL) "
    pub label: String,
    pub header_name: String,
    pub header_value: String,
    pub expected_body: String,
    /// Accept any certificate and hostname. Test targets only.
    pub allow_self_signed_tls: bool,
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            target_url: String::new(),
            total_requests: 0,
            label: String::new(),
            header_name: DEFAULT_HEADER_NAME.to_string(),
            header_value: synthetic_header(DEFAULT_HEADER_LEN),
            expected_body: DEFAULT_EXPECTED_BODY.to_string(),
            allow_self_signed_tls: false,
            request_timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl LoadTestConfig {
    pub fn new(target_url: impl Into<String>, total_requests: u64, label: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            total_requests,
            label: label.into(),
            ..Default::default()
        }
    }

    /// Check everything that can be known before the first request goes out.
    ///
    /// Returns the parsed target so callers do not parse it twice.
    pub fn validate(&self) -> HarnessResult<Url> {
        let url = Url::parse(&self.target_url)
            .map_err(|e| HarnessError::InvalidUrl(format!("{}: {}", self.target_url, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(HarnessError::UnsupportedScheme(other.to_string())),
        }

        if url.host_str().is_none() {
            return Err(HarnessError::InvalidUrl(format!(
                "{}: missing host",
                self.target_url
            )));
        }

        self.header()?;

        Ok(url)
    }

    /// Parsed form of the stress header.
    pub fn header(&self) -> HarnessResult<(HeaderName, HeaderValue)> {
        let name = HeaderName::from_bytes(self.header_name.as_bytes())
            .map_err(|e| HarnessError::InvalidHeader(format!("name {:?}: {}", self.header_name, e)))?;
        let value = HeaderValue::from_str(&self.header_value)
            .map_err(|e| HarnessError::InvalidHeader(format!("value for {}: {}", self.header_name, e)))?;
        Ok((name, value))
    }
}

/// Classification of a single request attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    NotFound,
    OtherFailure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::NotFound => "not_found",
            Outcome::OtherFailure => "other_failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the attempts of a run are scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// One attempt at a time on the calling task.
    Sequential,
    /// Fixed number of workers draining a bounded work queue.
    BoundedPool { workers: usize },
    /// One task per attempt. `max_in_flight` caps concurrent attempts if set.
    Unbounded { max_in_flight: Option<usize> },
    /// Bounded pool whose dispatcher is paced to `per_second` attempts.
    RateLimited { per_second: u32, workers: usize },
}

impl Strategy {
    pub fn validate(&self) -> HarnessResult<()> {
        match self {
            Strategy::Sequential => Ok(()),
            Strategy::BoundedPool { workers } if *workers == 0 => Err(
                HarnessError::InvalidStrategy("bounded pool needs at least one worker".into()),
            ),
            Strategy::BoundedPool { .. } => Ok(()),
            Strategy::Unbounded {
                max_in_flight: Some(0),
            } => Err(HarnessError::InvalidStrategy(
                "max_in_flight must be greater than zero".into(),
            )),
            Strategy::Unbounded { .. } => Ok(()),
            Strategy::RateLimited { per_second, workers } => {
                if *per_second == 0 {
                    return Err(HarnessError::InvalidStrategy(
                        "rate must be at least one request per second".into(),
                    ));
                }
                if *workers == 0 {
                    return Err(HarnessError::InvalidStrategy(
                        "rate-limited pool needs at least one worker".into(),
                    ));
                }
                Ok(())
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::BoundedPool { .. } => "bounded_pool",
            Strategy::Unbounded { .. } => "unbounded",
            Strategy::RateLimited { .. } => "rate_limited",
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::BoundedPool {
            workers: DEFAULT_POOL_WORKERS,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sequential => write!(f, "sequential"),
            Strategy::BoundedPool { workers } => write!(f, "bounded pool ({workers} workers)"),
            Strategy::Unbounded { max_in_flight: None } => write!(f, "unbounded"),
            Strategy::Unbounded {
                max_in_flight: Some(cap),
            } => write!(f, "unbounded (max {cap} in flight)"),
            Strategy::RateLimited { per_second, workers } => {
                write!(f, "rate limited ({per_second}/s, {workers} workers)")
            }
        }
    }
}

/// Shared stop flag checked by the dispatcher between attempts.
///
/// Attempts already dispatched always run to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// What the dispatcher did with the requested attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub dispatched: u64,
    /// Attempts never started because the run was cancelled
    pub skipped: u64,
}

/// Point-in-time view of the accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub success: u64,
    pub not_found: u64,
    pub other_failure: u64,
}

impl OutcomeCounts {
    pub fn completed(&self) -> u64 {
        self.success + self.not_found + self.other_failure
    }

    pub fn failures(&self) -> u64 {
        self.not_found + self.other_failure
    }
}
