//! Method routing.
//!
//! Maps fully-qualified `/package.Service/Method` names to type-erased
//! business handlers. Service modules register their handlers at startup;
//! the table is read-only once serving begins.

use meridian_core::RpcHandler;
use std::collections::HashMap;
use std::sync::Arc;

/// The method-to-handler table driven by the dispatcher.
#[derive(Default)]
pub struct MethodRouter {
    handlers: HashMap<String, Arc<dyn RpcHandler>>,
}

impl MethodRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a fully-qualified method name.
    ///
    /// A later registration for the same method replaces the earlier one.
    pub fn register<H: RpcHandler>(&mut self, method: impl Into<String>, handler: H) {
        self.register_arc(method, Arc::new(handler));
    }

    /// Registers an already-shared handler.
    pub fn register_arc(&mut self, method: impl Into<String>, handler: Arc<dyn RpcHandler>) {
        self.handlers.insert(method.into(), handler);
    }

    /// Looks up the handler for a method.
    #[must_use]
    pub fn get(&self, method: &str) -> Option<&Arc<dyn RpcHandler>> {
        self.handlers.get(method)
    }

    /// Whether a handler is registered for the method.
    #[must_use]
    pub fn contains(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no methods are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Iterates over the registered method names.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for MethodRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut methods: Vec<&str> = self.methods().collect();
        methods.sort_unstable();
        f.debug_struct("MethodRouter")
            .field("methods", &methods)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::{FnHandler, RequestContext, RpcResult, TypedHandler};
    use serde_json::{json, Value};

    fn echo_handler() -> impl RpcHandler {
        TypedHandler::new(FnHandler::new(|_ctx: &RequestContext, req: Value| async move {
            RpcResult::Ok(req)
        }))
    }

    #[test]
    fn register_and_look_up() {
        let mut router = MethodRouter::new();
        assert!(router.is_empty());

        router.register("/masterdata.v1.CategoryService/GetCategory", echo_handler());
        assert_eq!(router.len(), 1);
        assert!(router.contains("/masterdata.v1.CategoryService/GetCategory"));
        assert!(router.get("/masterdata.v1.CategoryService/GetCategory").is_some());
        assert!(router.get("/iam.v1.UserService/GetUser").is_none());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut router = MethodRouter::new();
        router.register("/t.S/M", echo_handler());
        router.register("/t.S/M", echo_handler());
        assert_eq!(router.len(), 1);
    }

    #[tokio::test]
    async fn registered_handler_is_invocable() {
        let mut router = MethodRouter::new();
        router.register("/t.S/Echo", echo_handler());

        let handler = router.get("/t.S/Echo").expect("registered").clone();
        let ctx = RequestContext::new();
        let response = handler
            .call(&ctx, meridian_core::Invocation::new("/t.S/Echo", json!({"x": 1})))
            .await
            .expect("echo succeeds");
        assert_eq!(response.payload()["x"], 1);
    }
}
