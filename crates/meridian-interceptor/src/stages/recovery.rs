//! Panic containment.
//!
//! Runs outermost around everything except the error envelope, so an
//! uncaught panic anywhere inside — interceptors or business logic —
//! becomes an internal-class failure instead of taking the process down.

use crate::interceptor::{Interceptor, Next};
use futures_util::FutureExt;
use meridian_core::{BoxFuture, Invocation, RequestContext, RpcResponse, Status};
use std::panic::AssertUnwindSafe;

/// Converts panics from inner stages into `Internal` failures.
#[derive(Debug, Clone, Default)]
pub struct RecoveryInterceptor;

impl RecoveryInterceptor {
    /// Creates the recovery stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for RecoveryInterceptor {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        invocation: Invocation,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>> {
        Box::pin(async move {
            let method = invocation.method().clone();

            match AssertUnwindSafe(next.run(ctx, invocation)).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => {
                    tracing::error!(
                        method = %method,
                        request_id = %ctx.request_id(),
                        panic = panic_message(&panic),
                        "panic recovered in handler"
                    );
                    Err(Status::internal("internal server error"))
                }
            }
        })
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn converts_panic_to_internal_failure() {
        let recovery = RecoveryInterceptor::new();
        let mut ctx = RequestContext::new();
        let invocation = Invocation::new("/test.v1.Svc/Boom", json!({}));

        let panicking = Next::handler(|_ctx, _inv| {
            Box::pin(async { panic!("boom in business logic") })
        });

        let err = recovery
            .call(&mut ctx, invocation, panicking)
            .await
            .unwrap_err();
        assert_eq!(err.code(), StatusCode::Internal);
        assert_eq!(err.message(), "internal server error");
    }

    #[tokio::test]
    async fn passes_success_through() {
        let recovery = RecoveryInterceptor::new();
        let mut ctx = RequestContext::new();
        let invocation = Invocation::new("/test.v1.Svc/Do", json!({}));

        let ok = Next::handler(|_ctx, _inv| {
            Box::pin(async { Ok(RpcResponse::new(json!({"done": true}))) })
        });

        let response = recovery.call(&mut ctx, invocation, ok).await.unwrap();
        assert_eq!(response.payload()["done"], true);
    }

    #[tokio::test]
    async fn passes_ordinary_failures_through_unchanged() {
        let recovery = RecoveryInterceptor::new();
        let mut ctx = RequestContext::new();
        let invocation = Invocation::new("/test.v1.Svc/Do", json!({}));

        let failing =
            Next::handler(|_ctx, _inv| Box::pin(async { Err(Status::not_found("gone")) }));

        let err = recovery.call(&mut ctx, invocation, failing).await.unwrap_err();
        assert_eq!(err.code(), StatusCode::NotFound);
        assert_eq!(err.message(), "gone");
    }
}
