//! Tracing span per call.
//!
//! Opens a span covering everything inward of this stage and records the
//! failure code when the call errors. Incoming W3C `traceparent` metadata
//! seeds the context's trace ID. The span is a side effect only; it never
//! influences control flow.

use crate::interceptor::{Interceptor, Next};
use meridian_core::{BoxFuture, Invocation, RequestContext, RpcResponse, Status};
use tracing::Instrument;

/// Metadata key carrying the W3C trace context.
pub const TRACEPARENT_METADATA: &str = "traceparent";

/// Wraps each call in a server-side tracing span.
#[derive(Debug, Clone, Default)]
pub struct TracingInterceptor;

impl TracingInterceptor {
    /// Creates the tracing stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

// Trace ID field of a `traceparent` header: `version-traceid-parentid-flags`.
fn incoming_trace_id(invocation: &Invocation) -> Option<String> {
    let header = invocation.metadata().get(TRACEPARENT_METADATA)?;
    let mut parts = header.split('-');
    let _version = parts.next()?;
    let trace_id = parts.next()?;
    if trace_id.len() == 32
        && trace_id.bytes().all(|b| b.is_ascii_hexdigit())
        && trace_id.bytes().any(|b| b != b'0')
    {
        Some(trace_id.to_string())
    } else {
        None
    }
}

impl Interceptor for TracingInterceptor {
    fn name(&self) -> &'static str {
        "tracing"
    }

    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        invocation: Invocation,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>> {
        Box::pin(async move {
            let span = tracing::info_span!(
                "rpc_request",
                otel.kind = "server",
                rpc.method = %invocation.method(),
                request.id = %ctx.request_id(),
                trace.id = tracing::field::Empty,
                error.code = tracing::field::Empty,
            );

            if let Some(trace_id) = incoming_trace_id(&invocation) {
                span.record("trace.id", trace_id.as_str());
                ctx.set_trace_id(trace_id);
            }
            if let Some(id) = span.id() {
                ctx.set_span_id(format!("{:x}", id.into_u64()));
            }

            let result = next.run(ctx, invocation).instrument(span.clone()).await;

            if let Err(status) = &result {
                span.record("error.code", status.code().as_str());
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::Metadata;
    use serde_json::json;

    #[tokio::test]
    async fn success_passes_through() {
        let stage = TracingInterceptor::new();
        let mut ctx = RequestContext::new();
        let invocation = Invocation::new("/test.v1.Svc/Do", json!({}));

        let ok = Next::handler(|_ctx, _inv| {
            Box::pin(async { Ok(RpcResponse::new(json!({"ok": true}))) })
        });

        let response = stage.call(&mut ctx, invocation, ok).await.unwrap();
        assert_eq!(response.payload()["ok"], true);
    }

    #[tokio::test]
    async fn failure_passes_through_unchanged() {
        let stage = TracingInterceptor::new();
        let mut ctx = RequestContext::new();
        let invocation = Invocation::new("/test.v1.Svc/Do", json!({}));

        let failing = Next::handler(|_ctx, _inv| {
            Box::pin(async { Err(Status::unavailable("downstream down")) })
        });

        let err = stage.call(&mut ctx, invocation, failing).await.unwrap_err();
        assert_eq!(err.message(), "downstream down");
    }

    #[tokio::test]
    async fn valid_traceparent_sets_the_trace_id() {
        let stage = TracingInterceptor::new();
        let mut ctx = RequestContext::new();
        let metadata: Metadata = [(
            TRACEPARENT_METADATA,
            "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01",
        )]
        .into_iter()
        .collect();
        let invocation = Invocation::new("/test.v1.Svc/Do", json!({})).with_metadata(metadata);

        let ok = Next::handler(|_ctx, _inv| Box::pin(async { Ok(RpcResponse::new(json!({}))) }));
        stage.call(&mut ctx, invocation, ok).await.unwrap();

        assert_eq!(ctx.trace_id(), Some("0af7651916cd43dd8448eb211c80319c"));
    }

    #[tokio::test]
    async fn malformed_traceparent_is_ignored() {
        let stage = TracingInterceptor::new();

        for header in [
            "not-a-traceparent",
            "00-short-b7ad6b7169203331-01",
            "00-00000000000000000000000000000000-b7ad6b7169203331-01",
        ] {
            let mut ctx = RequestContext::new();
            let metadata: Metadata = [(TRACEPARENT_METADATA, header)].into_iter().collect();
            let invocation =
                Invocation::new("/test.v1.Svc/Do", json!({})).with_metadata(metadata);

            let ok =
                Next::handler(|_ctx, _inv| Box::pin(async { Ok(RpcResponse::new(json!({}))) }));
            stage.call(&mut ctx, invocation, ok).await.unwrap();
            assert_eq!(ctx.trace_id(), None, "header {header}");
        }
    }
}
