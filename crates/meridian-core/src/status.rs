//! Transport status codes and the [`Status`] failure type.
//!
//! Every failure that crosses the pipeline boundary is a [`Status`]: a code
//! from the fixed transport taxonomy plus a human-readable message. The
//! [`StatusCode::http_status`] table is part of the wire contract — the
//! HTTP/JSON gateway and the error envelope both render codes through it.

use thiserror::Error;

/// Transport-level status codes.
///
/// The set mirrors the remote-procedure taxonomy the backend speaks to its
/// clients. [`StatusCode::http_status`] gives the numeric code carried in
/// response envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Not an error.
    Ok,
    /// The operation was cancelled by the caller.
    Canceled,
    /// The client specified an invalid argument.
    InvalidArgument,
    /// The deadline expired before the operation could complete.
    DeadlineExceeded,
    /// The requested entity was not found.
    NotFound,
    /// The entity the client attempted to create already exists.
    AlreadyExists,
    /// The caller does not have permission to execute the operation.
    PermissionDenied,
    /// A resource (e.g. the admission quota) has been exhausted.
    ResourceExhausted,
    /// The system is not in a state required for the operation.
    FailedPrecondition,
    /// Internal error.
    Internal,
    /// The service is currently unavailable.
    Unavailable,
    /// The request does not have valid authentication credentials.
    Unauthenticated,
    /// The operation is not implemented or enabled.
    Unimplemented,
}

impl StatusCode {
    /// Returns the HTTP status code for this transport code.
    ///
    /// This table is a wire contract; clients of the HTTP/JSON gateway key
    /// off the textual form placed into response envelopes.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::InvalidArgument => 400,
            Self::Unauthenticated => 401,
            Self::PermissionDenied => 403,
            Self::NotFound => 404,
            Self::AlreadyExists => 409,
            Self::FailedPrecondition => 412,
            Self::ResourceExhausted => 429,
            Self::Unimplemented => 501,
            Self::Unavailable => 503,
            Self::DeadlineExceeded => 504,
            Self::Canceled | Self::Internal => 500,
        }
    }

    /// Returns the canonical name of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Canceled => "Canceled",
            Self::InvalidArgument => "InvalidArgument",
            Self::DeadlineExceeded => "DeadlineExceeded",
            Self::NotFound => "NotFound",
            Self::AlreadyExists => "AlreadyExists",
            Self::PermissionDenied => "PermissionDenied",
            Self::ResourceExhausted => "ResourceExhausted",
            Self::FailedPrecondition => "FailedPrecondition",
            Self::Internal => "Internal",
            Self::Unavailable => "Unavailable",
            Self::Unauthenticated => "Unauthenticated",
            Self::Unimplemented => "Unimplemented",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport failure: a [`StatusCode`] and a message.
///
/// Interceptors and handlers fail with `Status`; the error envelope stage
/// renders it into the per-method response shape at the pipeline boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct Status {
    code: StatusCode,
    message: String,
}

impl Status {
    /// Creates a status with an explicit code.
    #[must_use]
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns the status code.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        self.code
    }

    /// Returns the status message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code for this failure.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Missing or invalid credentials.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::Unauthenticated, message)
    }

    /// The caller lacks a required permission.
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PermissionDenied, message)
    }

    /// Entity not found.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NotFound, message)
    }

    /// Invalid request argument.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StatusCode::InvalidArgument, message)
    }

    /// Entity already exists.
    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(StatusCode::AlreadyExists, message)
    }

    /// Admission or quota exhaustion.
    #[must_use]
    pub fn resource_exhausted(message: impl Into<String>) -> Self {
        Self::new(StatusCode::ResourceExhausted, message)
    }

    /// Precondition not met.
    #[must_use]
    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FailedPrecondition, message)
    }

    /// Internal failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::Internal, message)
    }

    /// Service unavailable.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::Unavailable, message)
    }

    /// Deadline expired.
    #[must_use]
    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(StatusCode::DeadlineExceeded, message)
    }

    /// Operation cancelled.
    #[must_use]
    pub fn canceled(message: impl Into<String>) -> Self {
        Self::new(StatusCode::Canceled, message)
    }

    /// Not implemented.
    #[must_use]
    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self::new(StatusCode::Unimplemented, message)
    }

    /// Classifies an arbitrary domain error into a `Status`.
    ///
    /// Errors that are already a `Status` pass through unchanged. Everything
    /// else is classified by matching the error text: "not found" →
    /// [`StatusCode::NotFound`], "already exists" →
    /// [`StatusCode::AlreadyExists`], "invalid" →
    /// [`StatusCode::InvalidArgument`], otherwise [`StatusCode::Internal`].
    ///
    /// The substring matching is heuristic and lossy. Domain layers that can
    /// carry an explicit kind should construct a `Status` directly instead
    /// of relying on this mapping.
    #[must_use]
    pub fn from_domain(err: &(dyn std::error::Error + 'static)) -> Self {
        if let Some(status) = err.downcast_ref::<Self>() {
            return status.clone();
        }

        let text = err.to_string();
        let lowered = text.to_lowercase();
        if lowered.contains("not found") {
            Self::not_found(text)
        } else if lowered.contains("already exists") {
            Self::already_exists(text)
        } else if lowered.contains("invalid") {
            Self::invalid_argument(text)
        } else {
            Self::internal(text)
        }
    }
}
