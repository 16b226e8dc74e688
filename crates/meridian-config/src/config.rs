//! The root configuration type.

use crate::error::ConfigError;
use crate::schema::{
    AuthConfig, LogFormat, RateLimitConfig, ServerConfig, TelemetrySection,
};
use serde::{Deserialize, Serialize};

/// Complete Meridian backend configuration.
///
/// Load through [`ConfigLoader`](crate::ConfigLoader); validate before use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct MeridianConfig {
    /// Server settings.
    pub server: ServerConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
    /// Admission-control settings.
    pub rate_limit: RateLimitConfig,
    /// Telemetry settings.
    pub telemetry: TelemetrySection,
}

impl MeridianConfig {
    /// A local-development preset: pretty logs, debug level, no auth secret
    /// requirement is waived — auth stays on but the secret must still be
    /// provided before `validate` passes.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.metrics.enabled = false;
        config
    }

    /// Checks addresses, bounds, and cross-field requirements.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.rpc_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.rpc_addr",
                format!("invalid socket address: {}", self.server.rpc_addr),
            ));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_secs",
                "must be greater than zero",
            ));
        }

        if self.auth.enabled && self.auth.token_secret.is_empty() {
            return Err(ConfigError::validation(
                "auth.token_secret must be set when auth.enabled is true",
            ));
        }

        if self.auth.revocation.enabled && self.auth.revocation.check_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "auth.revocation.check_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.rate_limit.requests_per_second <= 0.0 {
            return Err(ConfigError::invalid_value(
                "rate_limit.requests_per_second",
                "must be greater than zero",
            ));
        }

        if self.telemetry.metrics.enabled
            && self
                .telemetry
                .metrics
                .addr
                .parse::<std::net::SocketAddr>()
                .is_err()
        {
            return Err(ConfigError::invalid_value(
                "telemetry.metrics.addr",
                format!("invalid socket address: {}", self.telemetry.metrics.addr),
            ));
        }

        if !(0.0..=1.0).contains(&self.telemetry.tracing.sampling_ratio) {
            return Err(ConfigError::invalid_value(
                "telemetry.tracing.sampling_ratio",
                "must be between 0.0 and 1.0",
            ));
        }

        Ok(())
    }

    /// Bridges the telemetry section to the telemetry crate's config types.
    #[must_use]
    pub fn telemetry_config(&self) -> meridian_telemetry::TelemetryConfig {
        meridian_telemetry::TelemetryConfig {
            logging: meridian_telemetry::LogConfig {
                enabled: self.telemetry.logging.enabled,
                level: self.telemetry.logging.level.clone(),
                json_format: self.telemetry.logging.format == LogFormat::Json,
                include_target: true,
            },
            metrics: meridian_telemetry::MetricsConfig {
                enabled: self.telemetry.metrics.enabled,
                addr: self.telemetry.metrics.addr.clone(),
                ..meridian_telemetry::MetricsConfig::default()
            },
            tracing: meridian_telemetry::TracingConfig {
                enabled: self.telemetry.tracing.enabled,
                otlp_endpoint: self.telemetry.tracing.otlp_endpoint.clone(),
                service_name: self.telemetry.tracing.service_name.clone(),
                environment: self.telemetry.tracing.environment.clone(),
                sample_ratio: self.telemetry.tracing.sampling_ratio,
                ..meridian_telemetry::TracingConfig::default()
            },
        }
    }
}
