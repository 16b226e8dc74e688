//! Deadline enforcement.
//!
//! Innermost of the cross-cutting stages, so the deadline governs business
//! execution rather than pipeline overhead. A deadline is derived only when
//! the inbound call carried none; cancellation is cooperative — the inner
//! future is dropped at its next await point when the deadline elapses.

use crate::interceptor::{Interceptor, Next};
use meridian_core::{BoxFuture, Invocation, RequestContext, RpcResponse, Status};
use std::time::{Duration, Instant};

/// Default per-call execution budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounds business execution with a deadline.
#[derive(Debug, Clone)]
pub struct TimeoutInterceptor {
    default_timeout: Duration,
}

impl TimeoutInterceptor {
    /// Creates the stage with the given default budget.
    #[must_use]
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }
}

impl Default for TimeoutInterceptor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Interceptor for TimeoutInterceptor {
    fn name(&self) -> &'static str {
        "timeout"
    }

    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        invocation: Invocation,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>> {
        Box::pin(async move {
            let deadline = match ctx.deadline() {
                Some(deadline) => deadline,
                None => {
                    let deadline = Instant::now() + self.default_timeout;
                    ctx.set_deadline(deadline);
                    deadline
                }
            };

            let deadline = tokio::time::Instant::from_std(deadline);
            match tokio::time::timeout_at(deadline, next.run(ctx, invocation)).await {
                Ok(result) => result,
                Err(_) => Err(Status::deadline_exceeded("deadline exceeded")),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn derives_deadline_when_absent() {
        let stage = TimeoutInterceptor::new(Duration::from_secs(5));
        let mut ctx = RequestContext::new();
        assert!(ctx.deadline().is_none());

        let ok = Next::handler(|ctx, _inv| {
            let has_deadline = ctx.deadline().is_some();
            Box::pin(async move { Ok(RpcResponse::new(json!({ "deadline": has_deadline }))) })
        });

        let response = stage
            .call(&mut ctx, Invocation::new("/t.S/M", json!({})), ok)
            .await
            .unwrap();
        assert_eq!(response.payload()["deadline"], true);
        assert!(ctx.deadline().is_some());
    }

    #[tokio::test]
    async fn keeps_caller_supplied_deadline() {
        let stage = TimeoutInterceptor::new(Duration::from_secs(5));
        let mut ctx = RequestContext::new();
        let caller_deadline = Instant::now() + Duration::from_secs(60);
        ctx.set_deadline(caller_deadline);

        let ok = Next::handler(|_ctx, _inv| {
            Box::pin(async { Ok(RpcResponse::new(json!({}))) })
        });
        stage
            .call(&mut ctx, Invocation::new("/t.S/M", json!({})), ok)
            .await
            .unwrap();

        assert_eq!(ctx.deadline(), Some(caller_deadline));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsing_deadline_is_deadline_exceeded() {
        let stage = TimeoutInterceptor::new(Duration::from_millis(50));
        let mut ctx = RequestContext::new();

        let slow = Next::handler(|_ctx, _inv| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(RpcResponse::new(json!({})))
            })
        });

        let err = stage
            .call(&mut ctx, Invocation::new("/t.S/M", json!({})), slow)
            .await
            .unwrap_err();
        assert_eq!(err.code(), StatusCode::DeadlineExceeded);
    }
}
