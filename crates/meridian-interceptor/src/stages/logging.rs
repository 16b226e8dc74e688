//! Structured request logging.
//!
//! One entry when the call starts and one when it completes, carrying the
//! method, request ID, duration, and the failure if any.

use crate::interceptor::{Interceptor, Next};
use meridian_core::{BoxFuture, Invocation, RequestContext, RpcResponse, Status};
use std::time::Instant;

/// Logs request start and completion.
#[derive(Debug, Clone, Default)]
pub struct LoggingInterceptor;

impl LoggingInterceptor {
    /// Creates the logging stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for LoggingInterceptor {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        invocation: Invocation,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>> {
        Box::pin(async move {
            let method = invocation.method().clone();
            let request_id = ctx.request_id();
            let start = Instant::now();

            tracing::info!(
                method = %method,
                request_id = %request_id,
                "rpc request started"
            );

            let result = next.run(ctx, invocation).await;
            let duration = start.elapsed();

            match &result {
                Ok(_) => tracing::info!(
                    method = %method,
                    request_id = %request_id,
                    duration_ms = duration.as_millis() as u64,
                    "rpc request completed"
                ),
                Err(status) => tracing::error!(
                    method = %method,
                    request_id = %request_id,
                    duration_ms = duration.as_millis() as u64,
                    error = %status,
                    "rpc request failed"
                ),
            }

            result
        })
    }
}
