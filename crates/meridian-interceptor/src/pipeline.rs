//! Fixed-order pipeline composition.
//!
//! Every inbound call flows through the same chain, outermost to innermost:
//!
//! 1. **Envelope** — renders any surfaced failure into the method's
//!    response shape; must see everything, so it is outermost of all
//! 2. **Recovery** — panics become failures before any other bookkeeping
//! 3. **Request ID** — identifiers exist before anything references them
//! 4. **Tracing**
//! 5. **Metrics**
//! 6. **Rate limit** — rejects before expensive work runs
//! 7. **Logging**
//! 8. **Timeout** — innermost of the cross-cutting stages so the deadline
//!    governs business execution, not interceptor overhead
//! 9. **Auth / Authorization** — when the deployment requires credentials
//!
//! The order is fixed at build time and cannot be rearranged by callers.

use crate::interceptor::{Interceptor, Next};
use crate::stages::{
    AuthInterceptor, EnvelopeInterceptor, LoggingInterceptor, MetricsInterceptor,
    PermissionInterceptor, RateLimitInterceptor, RateLimiter, RecoveryInterceptor,
    RequestIdInterceptor, TimeoutInterceptor, TracingInterceptor, DEFAULT_TIMEOUT,
};
use meridian_core::{BoxFuture, Invocation, RequestContext, RpcResponse, Status};
use meridian_proto::ResponseCatalog;
use std::sync::Arc;
use std::time::Duration;

/// The assembled fixed-order interceptor chain.
pub struct InterceptorPipeline {
    stages: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorPipeline {
    /// Starts building a pipeline around a response catalog.
    #[must_use]
    pub fn builder(catalog: Arc<ResponseCatalog>) -> PipelineBuilder {
        PipelineBuilder::new(catalog)
    }

    /// Runs a call through the chain into the handler.
    pub async fn process<H>(
        &self,
        ctx: &mut RequestContext,
        invocation: Invocation,
        handler: H,
    ) -> Result<RpcResponse, Status>
    where
        H: FnOnce(&mut RequestContext, Invocation) -> BoxFuture<'static, Result<RpcResponse, Status>>
            + Send,
    {
        self.build_chain(handler).run(ctx, invocation).await
    }

    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: FnOnce(&mut RequestContext, Invocation) -> BoxFuture<'static, Result<RpcResponse, Status>>
            + Send
            + 'a,
    {
        let mut next = Next::handler(handler);
        for interceptor in self.stages.iter().rev() {
            next = Next::new(interceptor.as_ref(), next);
        }
        next
    }

    /// Stage names in execution order, for diagnostics.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }
}

impl std::fmt::Debug for InterceptorPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorPipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builds an [`InterceptorPipeline`].
///
/// Only the stage inputs are configurable, never the order.
pub struct PipelineBuilder {
    catalog: Arc<ResponseCatalog>,
    default_timeout: Duration,
    rate_limiter: Option<Arc<RateLimiter>>,
    auth: Option<AuthInterceptor>,
}

impl PipelineBuilder {
    fn new(catalog: Arc<ResponseCatalog>) -> Self {
        Self {
            catalog,
            default_timeout: DEFAULT_TIMEOUT,
            rate_limiter: None,
            auth: None,
        }
    }

    /// Overrides the default per-call execution budget.
    #[must_use]
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Enables admission control with the given shared limiter.
    #[must_use]
    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Requires authenticated access; authorization always accompanies it.
    #[must_use]
    pub fn authentication(mut self, auth: AuthInterceptor) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Assembles the fixed-order chain.
    #[must_use]
    pub fn build(self) -> InterceptorPipeline {
        let mut stages: Vec<Arc<dyn Interceptor>> = vec![
            Arc::new(EnvelopeInterceptor::new(self.catalog)),
            Arc::new(RecoveryInterceptor::new()),
            Arc::new(RequestIdInterceptor::new()),
            Arc::new(TracingInterceptor::new()),
            Arc::new(MetricsInterceptor::new()),
        ];
        if let Some(limiter) = self.rate_limiter {
            stages.push(Arc::new(RateLimitInterceptor::new(limiter)));
        }
        stages.push(Arc::new(LoggingInterceptor::new()));
        stages.push(Arc::new(TimeoutInterceptor::new(self.default_timeout)));
        if let Some(auth) = self.auth {
            stages.push(Arc::new(auth));
            stages.push(Arc::new(PermissionInterceptor::new()));
        }

        InterceptorPipeline { stages }
    }
}
