//! Error-envelope construction.
//!
//! The outermost stage of the whole chain. Successes pass through
//! untouched; failures are rebuilt into the invoked method's own response
//! shape with the `base` envelope populated from the failure, so HTTP/JSON
//! and native clients both see a schema-correct body. Methods the catalog
//! cannot resolve fall back to the raw transport failure — surfacing the
//! original error beats emitting a malformed envelope.

use crate::interceptor::{Interceptor, Next};
use meridian_core::{BoxFuture, Invocation, RequestContext, RpcResponse, Status};
use meridian_proto::ResponseCatalog;
use std::sync::Arc;

/// Renders failures into per-method success/failure envelopes.
#[derive(Clone)]
pub struct EnvelopeInterceptor {
    catalog: Arc<ResponseCatalog>,
}

impl EnvelopeInterceptor {
    /// Creates the stage around the response catalog.
    #[must_use]
    pub fn new(catalog: Arc<ResponseCatalog>) -> Self {
        Self { catalog }
    }
}

impl std::fmt::Debug for EnvelopeInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeInterceptor")
            .field("methods", &self.catalog.len())
            .finish()
    }
}

impl Interceptor for EnvelopeInterceptor {
    fn name(&self) -> &'static str {
        "envelope"
    }

    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        invocation: Invocation,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>> {
        Box::pin(async move {
            let method = invocation.method().clone();

            match next.run(ctx, invocation).await {
                Ok(response) => Ok(response),
                Err(status) => match self.catalog.envelope(&method, &status) {
                    Some(payload) => Ok(RpcResponse::new(payload)),
                    None => Err(status),
                },
            }
        })
    }
}
