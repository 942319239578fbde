//! Prometheus metrics exporter
//!
//! Exposes metrics via HTTP for Prometheus scraping.

use crate::metrics::recorder::init_metrics;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;

/// Global prometheus handle
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics server configuration
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics server
    pub listen_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9090)),
        }
    }
}

impl MetricsConfig {
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self { listen_addr: addr }
    }
}

/// Install the Prometheus recorder and start its HTTP listener.
///
/// Must be called from within a Tokio runtime. Subsequent calls return the
/// existing handle.
pub fn start_metrics_server(
    config: MetricsConfig,
) -> Result<&'static PrometheusHandle, MetricsError> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle);
    }

    let (recorder, exporter) = PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .build()
        .map_err(|e| MetricsError::SetupFailed(e.to_string()))?;
    let handle = recorder.handle();

    metrics::set_global_recorder(recorder)
        .map_err(|_| MetricsError::AlreadyInitialized)?;
    tokio::spawn(async move {
        if exporter.await.is_err() {
            tracing::warn!("metrics exporter stopped");
        }
    });

    // Descriptions only stick once the recorder is in place
    init_metrics();
    tracing::info!(addr = %config.listen_addr, "serving Prometheus metrics");

    Ok(PROMETHEUS_HANDLE.get_or_init(|| handle))
}

/// Render metrics as a string (for custom endpoints)
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}

/// Errors that can occur during metrics setup
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Failed to setup metrics: {0}")]
    SetupFailed(String),

    #[error("Metrics already initialized")]
    AlreadyInitialized,
}
