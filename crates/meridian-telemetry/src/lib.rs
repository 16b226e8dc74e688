//! Observability wiring for Meridian services.
//!
//! Three subsystems, initialized together by process bootstrap:
//!
//! - **Logging** — structured JSON (or pretty) output via
//!   `tracing-subscriber`
//! - **Metrics** — Prometheus-format series via the `metrics` facade
//! - **Tracing** — OTLP span export via OpenTelemetry
//!
//! The request pipeline only emits through the `tracing` and `metrics`
//! facades; nothing in the hot path depends on the exporters installed
//! here.

pub mod error;
pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::error::{TelemetryError, TelemetryResult};
pub use self::logging::{init_logging, LogConfig};
pub use self::metrics::{init_metrics, render_metrics, MetricsConfig};
pub use self::tracing::{init_tracing, shutdown_tracing, TracingConfig};

use opentelemetry_sdk::trace::TracerProvider;

/// Combined telemetry configuration.
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Logging section.
    pub logging: LogConfig,
    /// Metrics section.
    pub metrics: MetricsConfig,
    /// Tracing section.
    pub tracing: TracingConfig,
}

/// Keeps the telemetry subsystems alive; shut down explicitly on exit.
#[derive(Debug)]
pub struct TelemetryGuard {
    tracer_provider: Option<TracerProvider>,
}

impl TelemetryGuard {
    /// Flushes and tears down the exporters.
    pub fn shutdown(mut self) {
        if self.tracer_provider.take().is_some() {
            shutdown_tracing();
        }
    }
}

/// Initializes logging, metrics, and tracing in one call.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<TelemetryGuard> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;
    let tracer_provider = init_tracing(&config.tracing)?;
    Ok(TelemetryGuard { tracer_provider })
}
