//! Configuration sections.

use serde::{Deserialize, Serialize};

/// Server section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address for the RPC/JSON surface.
    pub rpc_addr: String,
    /// Default per-call execution budget, seconds.
    pub request_timeout_secs: u64,
    /// Grace period for in-flight calls during shutdown, seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rpc_addr: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            shutdown_grace_secs: 10,
        }
    }
}

/// Authentication section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Whether bearer authentication is required.
    pub enabled: bool,
    /// Shared symmetric secret for access-token verification.
    pub token_secret: String,
    /// Exact-match public methods, on top of the reserved namespaces.
    pub public_methods: Vec<String>,
    /// Revocation-check settings.
    pub revocation: RevocationConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token_secret: String::new(),
            public_methods: Vec::new(),
            revocation: RevocationConfig::default(),
        }
    }
}

/// Revocation-check section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RevocationConfig {
    /// Whether to consult the token blacklist at all.
    pub enabled: bool,
    /// Reject calls when the store is unreachable (fail-closed) instead of
    /// continuing (fail-open).
    pub fail_closed: bool,
    /// Budget for one blacklist lookup, milliseconds.
    pub check_timeout_ms: u64,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            fail_closed: false,
            check_timeout_ms: 2000,
        }
    }
}

/// Rate-limit section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Sustained admission rate, requests per second.
    pub requests_per_second: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 100.0,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines, one entry per line.
    #[default]
    Json,
    /// Human-readable output for local development.
    Pretty,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Whether logging is enabled.
    pub enabled: bool,
    /// Log level.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

/// Metrics section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsSection {
    /// Whether the Prometheus exporter is enabled.
    pub enabled: bool,
    /// Exporter listen address.
    pub addr: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Tracing section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TracingSection {
    /// Whether OTLP export is enabled.
    pub enabled: bool,
    /// OTLP collector endpoint.
    pub otlp_endpoint: String,
    /// Service name reported on spans.
    pub service_name: String,
    /// Deployment environment reported on spans.
    pub environment: String,
    /// Sampling ratio, 0.0 to 1.0.
    pub sampling_ratio: f64,
}

impl Default for TracingSection {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: "meridian".to_string(),
            environment: "development".to_string(),
            sampling_ratio: 1.0,
        }
    }
}

/// Telemetry section grouping logging, metrics, and tracing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetrySection {
    /// Logging settings.
    pub logging: LoggingSection,
    /// Metrics settings.
    pub metrics: MetricsSection,
    /// Tracing settings.
    pub tracing: TracingSection,
}
