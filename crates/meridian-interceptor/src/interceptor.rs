//! Core interceptor trait and chain types.
//!
//! Interceptors wrap the business handler in a fixed-order chain. Each one
//! receives the mutable request context, the invocation, and a [`Next`]
//! continuation it must run exactly once — unless it short-circuits with a
//! failure of its own.

use meridian_core::{BoxFuture, Invocation, RequestContext, RpcResponse, Status};

/// A single cross-cutting stage in the request pipeline.
///
/// # Invariants
///
/// - An interceptor either runs `next` exactly once or short-circuits with
///   a failure; it never retries.
/// - Failures from inner stages pass through unchanged, except for the
///   explicitly fail-open revocation check in the authenticator.
pub trait Interceptor: Send + Sync + 'static {
    /// The stage name, used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Processes the call, delegating inward via `next`.
    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        invocation: Invocation,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>>;
}

/// The continuation toward the business handler.
///
/// Consuming `run` makes calling it twice impossible.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        interceptor: &'a dyn Interceptor,
        next: Box<Next<'a>>,
    },
    Handler(
        Box<
            dyn FnOnce(&mut RequestContext, Invocation) -> BoxFuture<'static, Result<RpcResponse, Status>>
                + Send
                + 'a,
        >,
    ),
}

impl<'a> Next<'a> {
    /// Creates a continuation that enters the given interceptor.
    pub(crate) fn new(interceptor: &'a dyn Interceptor, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                interceptor,
                next: Box::new(next),
            },
        }
    }

    /// Creates the terminal continuation that invokes the handler.
    pub(crate) fn handler<F>(f: F) -> Self
    where
        F: FnOnce(&mut RequestContext, Invocation) -> BoxFuture<'static, Result<RpcResponse, Status>>
            + Send
            + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// Runs the rest of the chain.
    pub async fn run(
        self,
        ctx: &mut RequestContext,
        invocation: Invocation,
    ) -> Result<RpcResponse, Status> {
        match self.inner {
            NextInner::Chain { interceptor, next } => {
                interceptor.call(ctx, invocation, *next).await
            }
            NextInner::Handler(handler) => handler(ctx, invocation).await,
        }
    }
}
