//! Server errors.

use thiserror::Error;

/// Failures while starting or running the serving surface.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured listen address is not a valid socket address.
    #[error("invalid listen address {addr}: {message}")]
    InvalidAddress {
        /// The address as configured.
        addr: String,
        /// Why it failed to parse.
        message: String,
    },

    /// The listener could not bind.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The resolved socket address.
        addr: std::net::SocketAddr,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
