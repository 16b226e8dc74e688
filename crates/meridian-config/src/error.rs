//! Configuration errors.

use thiserror::Error;

/// Failures while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        /// The file path attempted.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file could not be parsed.
    #[error("failed to parse config file {path}: {message}")]
    Parse {
        /// The file path attempted.
        path: String,
        /// The parser's message.
        message: String,
    },

    /// A specific key holds an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Dotted key path (e.g. `server.rpc_addr`).
        key: String,
        /// What is wrong with it.
        message: String,
    },

    /// An environment variable override could not be parsed.
    #[error("invalid environment override {key}: {message}")]
    EnvParse {
        /// The full environment variable name.
        key: String,
        /// What was expected.
        message: String,
    },

    /// A cross-field validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl ConfigError {
    /// Creates an [`ConfigError::InvalidValue`].
    #[must_use]
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a [`ConfigError::Validation`].
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a [`ConfigError::EnvParse`].
    #[must_use]
    pub fn env_parse(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EnvParse {
            key: key.into(),
            message: message.into(),
        }
    }
}
