//! Fully-qualified method identifiers.
//!
//! Methods are addressed as `/<package>.<Service>/<Method>`. Two reserved
//! namespaces — health and reflection — are always exempt from
//! authentication and authorization.

/// Prefix of the health-check namespace.
pub const HEALTH_PREFIX: &str = "/grpc.health.v1.";

/// Prefix of the reflection namespace.
pub const REFLECTION_PREFIX: &str = "/grpc.reflection.";

/// A fully-qualified method name of the form `/package.Service/Method`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodName(String);

impl MethodName {
    /// Wraps a full method string.
    #[must_use]
    pub fn new(full: impl Into<String>) -> Self {
        Self(full.into())
    }

    /// Returns the full `/package.Service/Method` string.
    #[must_use]
    pub fn full(&self) -> &str {
        &self.0
    }

    /// Splits into the `package.Service` and `Method` parts.
    ///
    /// Returns `None` when the name does not have the expected
    /// two-segment shape.
    #[must_use]
    pub fn parts(&self) -> Option<(&str, &str)> {
        let trimmed = self.0.strip_prefix('/')?;
        let (service, method) = trimmed.split_once('/')?;
        if service.is_empty() || method.is_empty() || method.contains('/') {
            return None;
        }
        Some((service, method))
    }

    /// Returns the `package.Service` part, if well formed.
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.parts().map(|(service, _)| service)
    }

    /// Returns the bare method part, falling back to the full string.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.parts().map_or(self.0.as_str(), |(_, method)| method)
    }

    /// Whether the method lives in a reserved always-public namespace.
    #[must_use]
    pub fn is_exempt(&self) -> bool {
        self.0.starts_with(HEALTH_PREFIX) || self.0.starts_with(REFLECTION_PREFIX)
    }
}

impl std::fmt::Display for MethodName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MethodName {
    fn from(full: &str) -> Self {
        Self::new(full)
    }
}

impl From<String> for MethodName {
    fn from(full: String) -> Self {
        Self::new(full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_names() {
        let method = MethodName::new("/masterdata.v1.CategoryService/ListCategories");
        assert_eq!(
            method.parts(),
            Some(("masterdata.v1.CategoryService", "ListCategories"))
        );
        assert_eq!(method.service(), Some("masterdata.v1.CategoryService"));
        assert_eq!(method.short_name(), "ListCategories");
    }

    #[test]
    fn rejects_malformed_names() {
        assert_eq!(MethodName::new("no-slash").parts(), None);
        assert_eq!(MethodName::new("/only.Service").parts(), None);
        assert_eq!(MethodName::new("/a.Svc/B/C").parts(), None);
        assert_eq!(MethodName::new("//Method").parts(), None);
    }

    #[test]
    fn short_name_falls_back_to_full_string() {
        let method = MethodName::new("bogus");
        assert_eq!(method.short_name(), "bogus");
    }

    #[test]
    fn health_and_reflection_are_exempt() {
        assert!(MethodName::new("/grpc.health.v1.Health/Check").is_exempt());
        assert!(MethodName::new("/grpc.health.v1.Health/Watch").is_exempt());
        assert!(MethodName::new(
            "/grpc.reflection.v1alpha.ServerReflection/ServerReflectionInfo"
        )
        .is_exempt());
        assert!(!MethodName::new("/masterdata.v1.CategoryService/GetCategory").is_exempt());
    }
}
