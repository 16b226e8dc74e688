//! Prometheus metrics setup.
//!
//! Installs the `metrics` facade recorder with a Prometheus exporter and
//! registers descriptions for the standard request series:
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `meridian_requests_total` | Counter | `method`, `code` |
//! | `meridian_request_duration_seconds` | Histogram | `method` |
//! | `meridian_in_flight_requests` | Gauge | - |

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,
    /// Listener address for the Prometheus exporter (e.g. "0.0.0.0:9090").
    pub addr: String,
    /// Histogram buckets for request duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: "0.0.0.0:9090".to_string(),
            duration_buckets: vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// Installs the Prometheus recorder and registers metric descriptions.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    let handle = PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full("meridian_request_duration_seconds".to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);
    register_metric_descriptions();

    Ok(())
}

/// Renders all metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(
        "meridian_requests_total",
        "Total number of RPC requests processed"
    );
    describe_histogram!(
        "meridian_request_duration_seconds",
        "RPC request duration in seconds"
    );
    describe_gauge!(
        "meridian_in_flight_requests",
        "Number of RPC requests currently being processed"
    );
}
