//! The authenticated caller identity.
//!
//! [`RequestIdentity`] is built exactly once per call by the authentication
//! interceptor and attached to the request context. It is read-only from
//! that point on; downstream stages and handlers only query it.

use serde::{Deserialize, Serialize};

/// Role code that bypasses every permission check.
pub const SUPER_ADMIN_ROLE: &str = "SUPER_ADMIN";

/// Immutable identity bundle for an authenticated caller.
///
/// Constructed from verified credential claims. The pipeline treats this as
/// a value object: it is attached to the [`RequestContext`] once and never
/// mutated afterwards.
///
/// [`RequestContext`]: crate::RequestContext
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestIdentity {
    user_id: String,
    username: String,
    email: String,
    roles: Vec<String>,
    permissions: Vec<String>,
}

impl RequestIdentity {
    /// Creates an identity from verified claim fields.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        roles: Vec<String>,
        permissions: Vec<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            email: email.into(),
            roles,
            permissions,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the granted role codes.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Returns the granted permission codes.
    #[must_use]
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    /// Checks whether the identity holds a specific role code.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Checks whether the identity holds a specific permission code.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Checks for the distinguished super-admin role.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.has_role(SUPER_ADMIN_ROLE)
    }

    /// Returns a string identifier suitable for logging.
    ///
    /// Never includes credentials or other sensitive material.
    #[must_use]
    pub fn log_id(&self) -> String {
        format!("user:{}", self.user_id)
    }
}
