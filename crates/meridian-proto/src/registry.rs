//! Startup-time response registry.
//!
//! The transport layer cannot introspect message schemas at runtime, so the
//! catalog records, for every served method, a factory that constructs the
//! method's zero-valued response with the `base` envelope populated. The
//! error-envelope interceptor resolves failures through it; a method with no
//! entry falls back to the raw transport failure.

use crate::envelope::{ResponseStatus, StatusEnvelope};
use crate::{iam, masterdata, methods};
use meridian_core::{MethodName, Status};
use serde::Serialize;
use std::collections::HashMap;

type Factory = Box<dyn Fn(&ResponseStatus) -> Option<serde_json::Value> + Send + Sync>;

/// Maps fully-qualified method names to response factories.
pub struct ResponseCatalog {
    factories: HashMap<String, Factory>,
}

impl ResponseCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Creates a catalog covering every standard Meridian service method.
    #[must_use]
    pub fn with_standard_services() -> Self {
        let mut catalog = Self::new();
        catalog.register::<masterdata::CreateCategoryResponse>(methods::category::CREATE);
        catalog.register::<masterdata::GetCategoryResponse>(methods::category::GET);
        catalog.register::<masterdata::UpdateCategoryResponse>(methods::category::UPDATE);
        catalog.register::<masterdata::DeleteCategoryResponse>(methods::category::DELETE);
        catalog.register::<masterdata::ListCategoriesResponse>(methods::category::LIST);
        catalog.register::<masterdata::ExportCategoriesResponse>(methods::category::EXPORT);
        catalog.register::<masterdata::ImportCategoriesResponse>(methods::category::IMPORT);

        catalog.register::<iam::CreateUserResponse>(methods::user::CREATE);
        catalog.register::<iam::GetUserResponse>(methods::user::GET);
        catalog.register::<iam::UpdateUserResponse>(methods::user::UPDATE);
        catalog.register::<iam::DeleteUserResponse>(methods::user::DELETE);
        catalog.register::<iam::ListUsersResponse>(methods::user::LIST);
        catalog.register::<iam::GetUserAccessResponse>(methods::user::GET_ACCESS);
        catalog
    }

    /// Registers the response type for a method.
    pub fn register<T>(&mut self, method: impl Into<String>)
    where
        T: StatusEnvelope + Default + Serialize + 'static,
    {
        self.factories.insert(
            method.into(),
            Box::new(|base: &ResponseStatus| {
                let mut response = T::default();
                response.set_base(base.clone());
                serde_json::to_value(&response).ok()
            }),
        );
    }

    /// Whether a method has a registered response shape.
    #[must_use]
    pub fn contains(&self, method: &str) -> bool {
        self.factories.contains_key(method)
    }

    /// Number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Builds the schema-correct failure response for a method.
    ///
    /// The method name must have the `/package.Service/Method` shape and a
    /// registered factory; otherwise `None` is returned and the caller
    /// surfaces the original failure unchanged.
    #[must_use]
    pub fn envelope(&self, method: &MethodName, status: &Status) -> Option<serde_json::Value> {
        method.parts()?;
        let factory = self.factories.get(method.full())?;
        factory(&ResponseStatus::from_status(status))
    }
}

impl Default for ResponseCatalog {
    fn default() -> Self {
        Self::new()
    }
}
