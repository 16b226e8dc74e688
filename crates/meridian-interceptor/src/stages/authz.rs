//! Role/permission authorization.
//!
//! Pure policy over the identity the authenticator placed in context: the
//! reserved namespaces skip the check, `SUPER_ADMIN` bypasses the table,
//! unmapped methods need authentication only, and mapped methods require
//! the exact permission code. Never mutates state.

use crate::interceptor::{Interceptor, Next};
use meridian_auth::required_permission;
use meridian_core::{BoxFuture, Invocation, RequestContext, RpcResponse, Status};

/// Enforces the static method→permission table.
#[derive(Debug, Clone, Default)]
pub struct PermissionInterceptor;

impl PermissionInterceptor {
    /// Creates the authorization stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for PermissionInterceptor {
    fn name(&self) -> &'static str {
        "authorization"
    }

    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        invocation: Invocation,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>> {
        Box::pin(async move {
            if invocation.method().is_exempt() {
                return next.run(ctx, invocation).await;
            }

            if ctx.identity().is_some_and(|id| id.is_super_admin()) {
                return next.run(ctx, invocation).await;
            }

            let Some(required) = required_permission(invocation.method().full()) else {
                // No specific permission needed; authenticated access suffices.
                return next.run(ctx, invocation).await;
            };

            if ctx.identity().is_some_and(|id| id.has_permission(required)) {
                return next.run(ctx, invocation).await;
            }

            tracing::warn!(
                method = %invocation.method(),
                required,
                "permission denied"
            );
            Err(Status::permission_denied(format!(
                "permission denied: requires {required}"
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::{RequestIdentity, StatusCode, SUPER_ADMIN_ROLE};
    use serde_json::json;

    fn ctx_with(roles: &[&str], permissions: &[&str]) -> RequestContext {
        let mut ctx = RequestContext::new();
        ctx.attach_identity(RequestIdentity::new(
            "u-1",
            "alice",
            "alice@example.com",
            roles.iter().map(ToString::to_string).collect(),
            permissions.iter().map(ToString::to_string).collect(),
        ));
        ctx
    }

    fn ok_handler() -> Next<'static> {
        Next::handler(|_ctx, _inv| Box::pin(async { Ok(RpcResponse::new(json!({"ok": true}))) }))
    }

    #[tokio::test]
    async fn health_methods_skip_authorization() {
        let stage = PermissionInterceptor::new();
        let mut ctx = RequestContext::new();

        let result = stage
            .call(
                &mut ctx,
                Invocation::new("/grpc.health.v1.Health/Check", json!({})),
                ok_handler(),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn super_admin_bypasses_every_permission() {
        let stage = PermissionInterceptor::new();
        let mut ctx = ctx_with(&[SUPER_ADMIN_ROLE], &[]);

        for method in [
            "/masterdata.v1.CategoryService/CreateCategory",
            "/masterdata.v1.CategoryService/DeleteCategory",
            "/iam.v1.UserService/DeleteUser",
        ] {
            let result = stage
                .call(&mut ctx, Invocation::new(method, json!({})), ok_handler())
                .await;
            assert!(result.is_ok(), "method {method}");
        }
    }

    #[tokio::test]
    async fn exact_permission_allows_and_others_deny() {
        let stage = PermissionInterceptor::new();
        let mut ctx = ctx_with(&["CLERK"], &["masterdata.master.category.view"]);

        let allowed = stage
            .call(
                &mut ctx,
                Invocation::new("/masterdata.v1.CategoryService/GetCategory", json!({})),
                ok_handler(),
            )
            .await;
        assert!(allowed.is_ok());

        let denied = stage
            .call(
                &mut ctx,
                Invocation::new("/masterdata.v1.CategoryService/DeleteCategory", json!({})),
                ok_handler(),
            )
            .await
            .unwrap_err();
        assert_eq!(denied.code(), StatusCode::PermissionDenied);
        assert_eq!(
            denied.message(),
            "permission denied: requires masterdata.master.category.delete"
        );
    }

    #[tokio::test]
    async fn unmapped_methods_allow_authenticated_callers() {
        let stage = PermissionInterceptor::new();
        let mut ctx = ctx_with(&[], &[]);

        let result = stage
            .call(
                &mut ctx,
                Invocation::new("/iam.v1.AuthService/ChangePassword", json!({})),
                ok_handler(),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn missing_identity_is_denied_for_mapped_methods() {
        let stage = PermissionInterceptor::new();
        let mut ctx = RequestContext::new();

        let err = stage
            .call(
                &mut ctx,
                Invocation::new("/iam.v1.UserService/DeleteUser", json!({})),
                ok_handler(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), StatusCode::PermissionDenied);
    }
}
