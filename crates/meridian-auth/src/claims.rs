//! Credential claim payload.
//!
//! Tokens are minted by the external identity issuer; this backend only
//! verifies them. The claim set carries the standard registration fields
//! plus the identity bundle the pipeline attaches to the request context.

use meridian_core::RequestIdentity;
use serde::{Deserialize, Serialize};

/// The token-kind discriminator accepted by this backend.
///
/// Refresh and other kinds are rejected even when validly signed.
pub const TOKEN_TYPE_ACCESS: &str = "access";

/// Signed claim payload of an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuer.
    #[serde(default)]
    pub iss: String,
    /// Subject.
    #[serde(default)]
    pub sub: String,
    /// Expiry, Unix seconds. Required; enforced during verification.
    pub exp: u64,
    /// Issued-at, Unix seconds.
    #[serde(default)]
    pub iat: u64,
    /// Unique token ID, keyed by the revocation store.
    #[serde(default)]
    pub jti: String,
    /// Token kind; only [`TOKEN_TYPE_ACCESS`] is accepted here.
    #[serde(default)]
    pub token_type: String,
    /// User identifier.
    #[serde(default)]
    pub user_id: String,
    /// Username.
    #[serde(default)]
    pub username: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Granted role codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Granted permission codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

impl AccessClaims {
    /// Builds the immutable request identity from the verified claims.
    #[must_use]
    pub fn identity(&self) -> RequestIdentity {
        RequestIdentity::new(
            self.user_id.clone(),
            self.username.clone(),
            self.email.clone(),
            self.roles.clone(),
            self.permissions.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_carries_all_claim_fields() {
        let claims = AccessClaims {
            iss: "iam".to_string(),
            sub: "u-1".to_string(),
            exp: 2_000_000_000,
            iat: 0,
            jti: "jti-1".to_string(),
            token_type: TOKEN_TYPE_ACCESS.to_string(),
            user_id: "u-1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            roles: vec!["ADMIN".to_string()],
            permissions: vec!["iam.access.user.view".to_string()],
        };

        let identity = claims.identity();
        assert_eq!(identity.user_id(), "u-1");
        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.email(), "alice@example.com");
        assert!(identity.has_role("ADMIN"));
        assert!(identity.has_permission("iam.access.user.view"));
    }
}
