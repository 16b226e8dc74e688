//! Credential verification and access policy for the Meridian backend.
//!
//! This crate owns the authentication and authorization policy consumed by
//! the interceptor pipeline:
//!
//! - [`AccessClaims`] / [`TokenVerifier`] — bearer-token payload and its
//!   signature/expiry/kind verification
//! - [`TokenBlacklistChecker`] — the cross-service revocation collaborator,
//!   with an explicit [`RevocationPolicy`] (fail-open vs. fail-closed)
//! - [`required_permission`] — the static method→permission table, bypassed
//!   entirely by the `SUPER_ADMIN` role
//! - [`PublicMethods`] — exact-match public methods on top of the reserved
//!   health/reflection namespace exemptions

pub mod blacklist;
pub mod claims;
pub mod permissions;
pub mod public;
pub mod verifier;

pub use blacklist::{BlacklistError, RevocationPolicy, StaticBlacklist, TokenBlacklistChecker};
pub use claims::{AccessClaims, TOKEN_TYPE_ACCESS};
pub use permissions::required_permission;
pub use public::PublicMethods;
pub use verifier::{TokenError, TokenVerifier};
