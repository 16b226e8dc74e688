//! Public-method exemptions.
//!
//! Two layers: the reserved health/reflection namespaces are always exempt
//! (prefix match, see [`MethodName::is_exempt`]), and deployments may
//! additionally mark specific methods public by exact name — the identity
//! service does this for its login/refresh/logout family, which must be
//! callable without a token.

use meridian_core::MethodName;
use std::collections::HashSet;

/// Exact-match public methods layered over the reserved-prefix exemptions.
#[derive(Debug, Clone, Default)]
pub struct PublicMethods {
    methods: HashSet<String>,
}

impl PublicMethods {
    /// Creates an empty set; only the reserved prefixes are exempt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from full method names.
    #[must_use]
    pub fn from_methods<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }

    /// Marks a method public by full name.
    pub fn insert(&mut self, method: impl Into<String>) {
        self.methods.insert(method.into());
    }

    /// Whether a method may be called without credentials.
    #[must_use]
    pub fn is_public(&self, method: &MethodName) -> bool {
        method.is_exempt() || self.methods.contains(method.full())
    }
}
