//! Master-data category service messages.
//!
//! Field validation rules live with the domain owners; these are the wire
//! shapes only. Every response embeds the [`ResponseStatus`] envelope in
//! `base`.

use crate::envelope::ResponseStatus;
use crate::impl_status_envelope;
use serde::{Deserialize, Serialize};

/// A master-data category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier.
    pub id: String,
    /// Unique business code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp, RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last-update timestamp, RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Request to create a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    /// Unique business code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Response for category creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCategoryResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
    /// The created category on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Request to fetch one category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetCategoryRequest {
    /// Category identifier.
    pub id: String,
}

/// Response for a single-category fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetCategoryResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
    /// The category on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Request to update a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    /// Category identifier.
    pub id: String,
    /// New display name.
    pub name: String,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Response for a category update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
    /// The updated category on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Request to delete a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteCategoryRequest {
    /// Category identifier.
    pub id: String,
}

/// Response for a category deletion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteCategoryResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
}

/// Request to list categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCategoriesRequest {
    /// 1-based page number; 0 means first page.
    #[serde(default)]
    pub page: u32,
    /// Page size; 0 means server default.
    #[serde(default)]
    pub page_size: u32,
    /// Optional code/name search term.
    #[serde(default)]
    pub search: Option<String>,
}

/// Response for a category listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCategoriesResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
    /// The requested page.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Total matching rows.
    #[serde(default)]
    pub total_count: u64,
}

/// Request to export all categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportCategoriesRequest {}

/// Response carrying the exported spreadsheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportCategoriesResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
    /// Suggested file name.
    #[serde(default)]
    pub file_name: String,
    /// Spreadsheet bytes, base64.
    #[serde(default)]
    pub content: String,
}

/// Request to import categories from a spreadsheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportCategoriesRequest {
    /// Uploaded file name.
    pub file_name: String,
    /// Spreadsheet bytes, base64.
    pub content: String,
}

/// Response summarizing an import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportCategoriesResponse {
    /// Outcome envelope.
    #[serde(default)]
    pub base: ResponseStatus,
    /// Rows imported.
    #[serde(default)]
    pub imported_count: u64,
    /// Rows skipped as duplicates or invalid.
    #[serde(default)]
    pub skipped_count: u64,
}

impl_status_envelope!(
    CreateCategoryResponse,
    GetCategoryResponse,
    UpdateCategoryResponse,
    DeleteCategoryResponse,
    ListCategoriesResponse,
    ExportCategoriesResponse,
    ImportCategoriesResponse,
);
