//! IAM user service messages.

use crate::envelope::ResponseStatus;
use crate::impl_status_envelope;
use serde::{Deserialize, Serialize};

/// An identity-service user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier.
    pub id: String,
    /// Login name, unique.
    pub username: String,
    /// Email address, unique.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Whether the account can sign in.
    #[serde(default)]
    pub is_active: bool,
    /// Assigned role codes.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Request to create a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Initial role codes.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Response for user creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
    /// The created user on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Request to fetch one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetUserRequest {
    /// User identifier.
    pub id: String,
}

/// Response for a single-user fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetUserResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
    /// The user on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Request to update a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// User identifier.
    pub id: String,
    /// New display name.
    #[serde(default)]
    pub full_name: String,
    /// New email address.
    #[serde(default)]
    pub email: String,
}

/// Response for a user update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
    /// The updated user on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Request to delete a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    /// User identifier.
    pub id: String,
}

/// Response for a user deletion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
}

/// Request to list users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersRequest {
    /// 1-based page number; 0 means first page.
    #[serde(default)]
    pub page: u32,
    /// Page size; 0 means server default.
    #[serde(default)]
    pub page_size: u32,
    /// Optional username/email search term.
    #[serde(default)]
    pub search: Option<String>,
}

/// Response for a user listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
    /// The requested page.
    #[serde(default)]
    pub users: Vec<User>,
    /// Total matching rows.
    #[serde(default)]
    pub total_count: u64,
}

/// Request for a user's effective access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetUserAccessRequest {
    /// User identifier.
    pub id: String,
}

/// Response carrying a user's effective roles and permissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetUserAccessResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
    /// Effective role codes.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Effective permission codes.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl_status_envelope!(
    CreateUserResponse,
    GetUserResponse,
    UpdateUserResponse,
    DeleteUserResponse,
    ListUsersResponse,
    GetUserAccessResponse,
);
