//! Layered configuration loading.
//!
//! Later layers override earlier ones: built-in defaults, then a TOML file,
//! then `MERIDIAN__SECTION__FIELD` environment variables. A `.env` file can
//! seed the environment before the override pass runs.

use crate::config::MeridianConfig;
use crate::error::ConfigError;
use crate::schema::LogFormat;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// The environment-variable prefix used by the standard deployment.
pub const ENV_PREFIX: &str = "MERIDIAN";

/// Loads a [`MeridianConfig`] in layers.
///
/// ```no_run
/// use meridian_config::ConfigLoader;
///
/// # fn main() -> Result<(), meridian_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_dotenv()
///     .with_optional_file("meridian.toml")?
///     .with_env_prefix(meridian_config::ENV_PREFIX)
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: MeridianConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Starts from built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MeridianConfig::default(),
            env_prefix: None,
        }
    }

    /// Starts from the local-development preset instead of the defaults.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = MeridianConfig::development();
        self
    }

    /// Loads a `.env` file into the process environment, if one exists.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        let _ = dotenvy::dotenv();
        self
    }

    /// Applies a TOML configuration file over the current layer.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        self.config = toml::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is not an
    /// error.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Enables environment overrides with the given prefix.
    ///
    /// Variables use the `PREFIX__SECTION__FIELD` form, for example
    /// `MERIDIAN__SERVER__RPC_ADDR=0.0.0.0:9000` or
    /// `MERIDIAN__AUTH__REVOCATION__FAIL_CLOSED=true`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Applies environment overrides, validates, and returns the result.
    pub fn load(mut self) -> Result<MeridianConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars: HashMap<String, String> = env::vars()
                .filter(|(key, _)| key.starts_with(&prefix))
                .collect();
            for (key, value) in vars {
                self.apply_env_var(&key, &value, &prefix)?;
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix("__"))
        else {
            return Ok(());
        };
        let parts: Vec<&str> = rest.split("__").collect();

        match parts.as_slice() {
            ["SERVER", "RPC_ADDR"] => {
                self.config.server.rpc_addr = value.to_string();
            }
            ["SERVER", "REQUEST_TIMEOUT_SECS"] => {
                self.config.server.request_timeout_secs = parse_int(key, value)?;
            }
            ["SERVER", "SHUTDOWN_GRACE_SECS"] => {
                self.config.server.shutdown_grace_secs = parse_int(key, value)?;
            }

            ["AUTH", "ENABLED"] => {
                self.config.auth.enabled = parse_bool(key, value)?;
            }
            ["AUTH", "TOKEN_SECRET"] => {
                self.config.auth.token_secret = value.to_string();
            }
            ["AUTH", "PUBLIC_METHODS"] => {
                self.config.auth.public_methods = value
                    .split(',')
                    .map(str::trim)
                    .filter(|method| !method.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            ["AUTH", "REVOCATION", "ENABLED"] => {
                self.config.auth.revocation.enabled = parse_bool(key, value)?;
            }
            ["AUTH", "REVOCATION", "FAIL_CLOSED"] => {
                self.config.auth.revocation.fail_closed = parse_bool(key, value)?;
            }
            ["AUTH", "REVOCATION", "CHECK_TIMEOUT_MS"] => {
                self.config.auth.revocation.check_timeout_ms = parse_int(key, value)?;
            }

            ["RATE_LIMIT", "REQUESTS_PER_SECOND"] => {
                self.config.rate_limit.requests_per_second = parse_float(key, value)?;
            }

            ["TELEMETRY", "LOGGING", "ENABLED"] => {
                self.config.telemetry.logging.enabled = parse_bool(key, value)?;
            }
            ["TELEMETRY", "LOGGING", "LEVEL"] => {
                self.config.telemetry.logging.level = value.to_string();
            }
            ["TELEMETRY", "LOGGING", "FORMAT"] => {
                self.config.telemetry.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => return Err(ConfigError::env_parse(key, "expected 'json' or 'pretty'")),
                };
            }
            ["TELEMETRY", "METRICS", "ENABLED"] => {
                self.config.telemetry.metrics.enabled = parse_bool(key, value)?;
            }
            ["TELEMETRY", "METRICS", "ADDR"] => {
                self.config.telemetry.metrics.addr = value.to_string();
            }
            ["TELEMETRY", "TRACING", "ENABLED"] => {
                self.config.telemetry.tracing.enabled = parse_bool(key, value)?;
            }
            ["TELEMETRY", "TRACING", "OTLP_ENDPOINT"] => {
                self.config.telemetry.tracing.otlp_endpoint = value.to_string();
            }
            ["TELEMETRY", "TRACING", "SERVICE_NAME"] => {
                self.config.telemetry.tracing.service_name = value.to_string();
            }
            ["TELEMETRY", "TRACING", "ENVIRONMENT"] => {
                self.config.telemetry.tracing.environment = value.to_string();
            }
            ["TELEMETRY", "TRACING", "SAMPLING_RATIO"] => {
                self.config.telemetry.tracing.sampling_ratio = parse_float(key, value)?;
            }

            // Unknown keys under the prefix are ignored so unrelated
            // variables sharing it do not break startup.
            _ => {}
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::env_parse(key, "expected boolean")),
    }
}

fn parse_int<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse(key, "expected integer"))
}

fn parse_float(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse(key, "expected float"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn loader_with_secret() -> ConfigLoader {
        let mut loader = ConfigLoader::new();
        loader.config.auth.token_secret = "secret".to_string();
        loader
    }

    #[test]
    fn defaults_load_when_auth_disabled() {
        let mut loader = ConfigLoader::new();
        loader.config.auth.enabled = false;
        let config = loader.load().expect("defaults are valid");
        assert_eq!(config.server.rpc_addr, "0.0.0.0:8080");
        assert_eq!(config.server.request_timeout_secs, 30);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        write!(
            file,
            r#"
            [server]
            rpc_addr = "127.0.0.1:9000"

            [auth]
            token_secret = "from-file"

            [rate_limit]
            requests_per_second = 25.0
            "#
        )
        .expect("write config");

        let config = ConfigLoader::new()
            .with_file(file.path())
            .expect("file parses")
            .load()
            .expect("config validates");

        assert_eq!(config.server.rpc_addr, "127.0.0.1:9000");
        assert_eq!(config.auth.token_secret, "from-file");
        assert!((config.rate_limit.requests_per_second - 25.0).abs() < f64::EPSILON);
        // Unset sections keep their defaults.
        assert_eq!(config.server.shutdown_grace_secs, 10);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = ConfigLoader::new().with_file("/nonexistent/meridian.toml");
        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn missing_optional_file_keeps_defaults() {
        let loader = ConfigLoader::new()
            .with_optional_file("/nonexistent/meridian.toml")
            .expect("missing optional file is fine");
        assert_eq!(loader.config.server.rpc_addr, "0.0.0.0:8080");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        write!(file, "[server\nrpc_addr = ").expect("write config");

        let result = ConfigLoader::new().with_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn unknown_file_fields_are_rejected() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        write!(file, "[server]\nhttp2 = true").expect("write config");

        assert!(ConfigLoader::new().with_file(file.path()).is_err());
    }

    // Environment overrides are tested through apply_env_var directly;
    // mutating the process environment from tests races other tests.

    #[test]
    fn env_overrides_server_and_auth() {
        let mut loader = loader_with_secret();
        loader
            .apply_env_var("MERIDIAN__SERVER__RPC_ADDR", "10.0.0.1:8443", "MERIDIAN")
            .expect("addr applies");
        loader
            .apply_env_var("MERIDIAN__AUTH__REVOCATION__FAIL_CLOSED", "true", "MERIDIAN")
            .expect("policy applies");
        loader
            .apply_env_var(
                "MERIDIAN__AUTH__PUBLIC_METHODS",
                "/iam.v1.AuthService/Login, /iam.v1.AuthService/Refresh",
                "MERIDIAN",
            )
            .expect("methods apply");

        assert_eq!(loader.config.server.rpc_addr, "10.0.0.1:8443");
        assert!(loader.config.auth.revocation.fail_closed);
        assert_eq!(
            loader.config.auth.public_methods,
            vec!["/iam.v1.AuthService/Login", "/iam.v1.AuthService/Refresh"]
        );
    }

    #[test]
    fn env_overrides_telemetry() {
        let mut loader = loader_with_secret();
        loader
            .apply_env_var("MERIDIAN__TELEMETRY__LOGGING__FORMAT", "pretty", "MERIDIAN")
            .expect("format applies");
        loader
            .apply_env_var(
                "MERIDIAN__TELEMETRY__TRACING__SAMPLING_RATIO",
                "0.1",
                "MERIDIAN",
            )
            .expect("ratio applies");

        assert_eq!(loader.config.telemetry.logging.format, LogFormat::Pretty);
        assert!((loader.config.telemetry.tracing.sampling_ratio - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_env_values_are_rejected() {
        let mut loader = loader_with_secret();
        assert!(loader
            .apply_env_var("MERIDIAN__SERVER__REQUEST_TIMEOUT_SECS", "soon", "MERIDIAN")
            .is_err());
        assert!(loader
            .apply_env_var("MERIDIAN__AUTH__ENABLED", "maybe", "MERIDIAN")
            .is_err());
        assert!(loader
            .apply_env_var("MERIDIAN__TELEMETRY__LOGGING__FORMAT", "xml", "MERIDIAN")
            .is_err());
    }

    #[test]
    fn unknown_env_keys_are_ignored() {
        let mut loader = loader_with_secret();
        loader
            .apply_env_var("MERIDIAN__SOMETHING__ELSE", "whatever", "MERIDIAN")
            .expect("unknown keys are skipped");
        assert_eq!(loader.config.server.rpc_addr, "0.0.0.0:8080");
    }
}
