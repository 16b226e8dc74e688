//! Fully-qualified method names served by the backend.

/// Master-data category service methods.
pub mod category {
    /// Create a category.
    pub const CREATE: &str = "/masterdata.v1.CategoryService/CreateCategory";
    /// Fetch one category.
    pub const GET: &str = "/masterdata.v1.CategoryService/GetCategory";
    /// Update a category.
    pub const UPDATE: &str = "/masterdata.v1.CategoryService/UpdateCategory";
    /// Delete a category.
    pub const DELETE: &str = "/masterdata.v1.CategoryService/DeleteCategory";
    /// List categories with paging.
    pub const LIST: &str = "/masterdata.v1.CategoryService/ListCategories";
    /// Export categories to a spreadsheet.
    pub const EXPORT: &str = "/masterdata.v1.CategoryService/ExportCategories";
    /// Import categories from a spreadsheet.
    pub const IMPORT: &str = "/masterdata.v1.CategoryService/ImportCategories";

    /// All category methods.
    pub const ALL: [&str; 7] = [CREATE, GET, UPDATE, DELETE, LIST, EXPORT, IMPORT];
}

/// IAM user service methods.
pub mod user {
    /// Create a user.
    pub const CREATE: &str = "/iam.v1.UserService/CreateUser";
    /// Fetch one user.
    pub const GET: &str = "/iam.v1.UserService/GetUser";
    /// Update a user.
    pub const UPDATE: &str = "/iam.v1.UserService/UpdateUser";
    /// Delete a user.
    pub const DELETE: &str = "/iam.v1.UserService/DeleteUser";
    /// List users with paging.
    pub const LIST: &str = "/iam.v1.UserService/ListUsers";
    /// Resolve a user's effective roles and permissions.
    pub const GET_ACCESS: &str = "/iam.v1.UserService/GetUserAccess";

    /// All user methods.
    pub const ALL: [&str; 6] = [CREATE, GET, UPDATE, DELETE, LIST, GET_ACCESS];
}

/// Health service methods.
pub mod health {
    /// Health check.
    pub const CHECK: &str = "/grpc.health.v1.Health/Check";
}
