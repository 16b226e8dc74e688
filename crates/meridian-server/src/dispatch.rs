//! Per-call dispatch through the interceptor pipeline.

use crate::router::MethodRouter;
use meridian_core::{Invocation, RequestContext, RpcResponse, Status};
use meridian_interceptor::InterceptorPipeline;

/// Drives one pipeline pass per inbound call.
///
/// The dispatcher resolves the business handler before entering the
/// pipeline; an unregistered method still passes through every stage and
/// fails at the center with `Unimplemented`, so admission control and
/// authentication apply uniformly.
pub struct RpcDispatcher {
    router: MethodRouter,
    pipeline: InterceptorPipeline,
}

impl RpcDispatcher {
    /// Creates a dispatcher over a routing table and an assembled pipeline.
    #[must_use]
    pub fn new(router: MethodRouter, pipeline: InterceptorPipeline) -> Self {
        Self { router, pipeline }
    }

    /// Returns the routing table.
    #[must_use]
    pub fn router(&self) -> &MethodRouter {
        &self.router
    }

    /// Runs one call through the full chain.
    ///
    /// The returned context carries the request ID assigned by the
    /// correlation stage, for echoing on the transport response.
    pub async fn dispatch(
        &self,
        invocation: Invocation,
    ) -> (RequestContext, Result<RpcResponse, Status>) {
        let mut ctx = RequestContext::new();

        let result = match self.router.get(invocation.method().full()).cloned() {
            Some(handler) => {
                self.pipeline
                    .process(&mut ctx, invocation, move |ctx, inv| {
                        // Handlers only read the context; a snapshot keeps
                        // the business future independent of the pipeline's
                        // mutable borrow.
                        let ctx = ctx.clone();
                        Box::pin(async move { handler.call(&ctx, inv).await })
                    })
                    .await
            }
            None => {
                let method = invocation.method().full().to_string();
                self.pipeline
                    .process(&mut ctx, invocation, move |_ctx, _inv| {
                        Box::pin(async move {
                            Err(Status::unimplemented(format!("unknown method: {method}")))
                        })
                    })
                    .await
            }
        };

        (ctx, result)
    }
}

impl std::fmt::Debug for RpcDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcDispatcher")
            .field("methods", &self.router.len())
            .field("stages", &self.pipeline.stage_names())
            .finish()
    }
}
