//! The uniform response envelope.
//!
//! Every service response embeds a `base` field of this shape. Success
//! envelopes are built by business handlers; failure envelopes are built by
//! the error-envelope interceptor from a transport [`Status`].

use meridian_core::Status;
use serde::{Deserialize, Serialize};

/// A field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// The offending field, in `snake_case` request naming.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldViolation {
    /// Creates a violation for a named field.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The uniform success/failure shell embedded in every response.
///
/// `status_code` carries the numeric HTTP-style code as text; the exact
/// digits are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// Whether the operation succeeded.
    pub is_success: bool,
    /// HTTP-style numeric code, as text (e.g. `"404"`).
    pub status_code: String,
    /// Human-readable outcome description.
    pub message: String,
    /// Field-level validation errors, when the failure is a validation one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<FieldViolation>,
}

impl Default for ResponseStatus {
    fn default() -> Self {
        Self {
            is_success: false,
            status_code: String::new(),
            message: String::new(),
            validation_errors: Vec::new(),
        }
    }
}

impl ResponseStatus {
    fn with_code(is_success: bool, code: u16, message: impl Into<String>) -> Self {
        Self {
            is_success,
            status_code: code.to_string(),
            message: message.into(),
            validation_errors: Vec::new(),
        }
    }

    /// A `200` success envelope.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_code(true, 200, message)
    }

    /// A `201` creation envelope.
    #[must_use]
    pub fn created(message: impl Into<String>) -> Self {
        Self::with_code(true, 201, message)
    }

    /// A `400` failure envelope.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(false, 400, message)
    }

    /// A `404` failure envelope.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(false, 404, message)
    }

    /// A `409` failure envelope.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_code(false, 409, message)
    }

    /// A `500` failure envelope.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_code(false, 500, message)
    }

    /// A `400` envelope carrying field-level violations.
    #[must_use]
    pub fn validation_failed(violations: Vec<FieldViolation>) -> Self {
        let mut status = Self::with_code(false, 400, "Validation failed");
        status.validation_errors = violations;
        status
    }

    /// Builds a failure envelope from a transport [`Status`].
    ///
    /// The numeric code comes from the fixed status table and is rendered
    /// as text; the message is carried through verbatim.
    #[must_use]
    pub fn from_status(status: &Status) -> Self {
        Self::with_code(false, status.http_status(), status.message())
    }
}

/// Implemented by every response message that embeds a `base` envelope.
pub trait StatusEnvelope {
    /// Replaces the embedded envelope.
    fn set_base(&mut self, base: ResponseStatus);
}

/// Implements [`StatusEnvelope`] for response types with a `base` field.
#[macro_export]
macro_rules! impl_status_envelope {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::envelope::StatusEnvelope for $ty {
                fn set_base(&mut self, base: $crate::envelope::ResponseStatus) {
                    self.base = base;
                }
            }
        )+
    };
}
