//! Cross-service token revocation.
//!
//! Logout in the identity service places a token's unique ID on a shared
//! blacklist; other services consult it through the
//! [`TokenBlacklistChecker`] interface before trusting an otherwise valid
//! token. The store itself (Redis in production) lives behind the trait.
//!
//! Whether a failing store blocks the call is an availability/security
//! trade-off; it is configured explicitly through [`RevocationPolicy`]
//! rather than hardcoded.

use meridian_core::BoxFuture;
use parking_lot::RwLock;
use std::collections::HashSet;
use thiserror::Error;

/// A revocation-store lookup failure.
#[derive(Debug, Clone, Error)]
#[error("blacklist check failed: {message}")]
pub struct BlacklistError {
    /// What went wrong in the store.
    pub message: String,
}

impl BlacklistError {
    /// Creates an error with a store-specific message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Checks whether a token ID has been revoked before its natural expiry.
pub trait TokenBlacklistChecker: Send + Sync + 'static {
    /// Returns whether the token ID is on the blacklist.
    fn is_blacklisted<'a>(&'a self, token_id: &'a str) -> BoxFuture<'a, Result<bool, BlacklistError>>;
}

/// What to do when the revocation store itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevocationPolicy {
    /// Log and continue as if the token were not revoked.
    ///
    /// Bounded by short access-token lifetimes; favors availability.
    #[default]
    FailOpen,
    /// Reject the call when revocation cannot be verified.
    FailClosed,
}

/// In-memory blacklist, for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct StaticBlacklist {
    revoked: RwLock<HashSet<String>>,
}

impl StaticBlacklist {
    /// Creates an empty blacklist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a token ID as revoked.
    pub fn revoke(&self, token_id: impl Into<String>) {
        self.revoked.write().insert(token_id.into());
    }
}

impl TokenBlacklistChecker for StaticBlacklist {
    fn is_blacklisted<'a>(&'a self, token_id: &'a str) -> BoxFuture<'a, Result<bool, BlacklistError>> {
        Box::pin(async move { Ok(self.revoked.read().contains(token_id)) })
    }
}
