//! Wire message types for the Meridian services.
//!
//! Every response message embeds the uniform [`ResponseStatus`] envelope in
//! its `base` field. The [`ResponseCatalog`] maps each fully-qualified
//! method name to a factory that builds that method's response shape with a
//! populated envelope — the startup-time replacement for runtime message
//! reflection.

pub mod envelope;
pub mod iam;
pub mod masterdata;
pub mod methods;
pub mod registry;

pub use envelope::{FieldViolation, ResponseStatus, StatusEnvelope};
pub use registry::ResponseCatalog;
