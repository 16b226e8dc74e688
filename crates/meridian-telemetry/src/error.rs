//! Telemetry initialization errors.

use thiserror::Error;

/// Failures while bringing up the observability subsystems.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The logging subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),

    /// The Prometheus recorder could not be installed.
    #[error("failed to initialize metrics: {0}")]
    MetricsInit(String),

    /// The OTLP tracer could not be built.
    #[error("failed to initialize tracing: {0}")]
    TracingInit(String),

    /// A listener address could not be parsed.
    #[error("invalid listen address: {0}")]
    InvalidAddress(String),
}

/// Result alias for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
