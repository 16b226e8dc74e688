//! Handler traits for business logic at the center of the pipeline.
//!
//! Business handlers are written against the typed [`Handler`] trait; the
//! router stores them type-erased as [`RpcHandler`] trait objects via
//! [`TypedHandler`], which does the JSON (de)serialization at the seam.

use crate::context::RequestContext;
use crate::invocation::{Invocation, RpcResponse};
use crate::status::Status;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

/// A boxed future, as returned by type-erased handlers and interceptors.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A typed request handler.
///
/// # Example
///
/// ```
/// use meridian_core::{Handler, RequestContext, RpcResult};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize)]
/// struct GetCategoryRequest {
///     id: String,
/// }
///
/// #[derive(Serialize)]
/// struct Category {
///     id: String,
///     code: String,
/// }
///
/// struct GetCategoryHandler;
///
/// impl Handler<GetCategoryRequest, Category> for GetCategoryHandler {
///     async fn handle(
///         &self,
///         _ctx: &RequestContext,
///         req: GetCategoryRequest,
///     ) -> RpcResult<Category> {
///         Ok(Category { id: req.id, code: "GEN".to_string() })
///     }
/// }
/// ```
pub trait Handler<Req, Res>: Send + Sync + 'static
where
    Req: DeserializeOwned + Send + 'static,
    Res: Serialize + Send + 'static,
{
    /// Handles a request and returns a response or a [`Status`] failure.
    fn handle(
        &self,
        ctx: &RequestContext,
        request: Req,
    ) -> impl Future<Output = Result<Res, Status>> + Send;
}

/// A type-erased handler suitable for storage in the method router.
pub trait RpcHandler: Send + Sync + 'static {
    /// Handles a call with a JSON payload.
    fn call<'a>(
        &'a self,
        ctx: &'a RequestContext,
        invocation: Invocation,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>>;
}

/// Adapter from a typed [`Handler`] to the type-erased [`RpcHandler`].
///
/// Deserialization failures become [`Status::invalid_argument`];
/// serialization failures become [`Status::internal`].
pub struct TypedHandler<H, Req, Res> {
    inner: H,
    _marker: PhantomData<fn(Req) -> Res>,
}

impl<H, Req, Res> TypedHandler<H, Req, Res>
where
    H: Handler<Req, Res>,
    Req: DeserializeOwned + Send + 'static,
    Res: Serialize + Send + 'static,
{
    /// Wraps a typed handler.
    #[must_use]
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<H, Req, Res> RpcHandler for TypedHandler<H, Req, Res>
where
    H: Handler<Req, Res>,
    Req: DeserializeOwned + Send + 'static,
    Res: Serialize + Send + 'static,
{
    fn call<'a>(
        &'a self,
        ctx: &'a RequestContext,
        invocation: Invocation,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>> {
        Box::pin(async move {
            let request: Req = serde_json::from_value(invocation.into_payload())
                .map_err(|e| Status::invalid_argument(format!("malformed request payload: {e}")))?;
            let response = self.inner.handle(ctx, request).await?;
            let payload = serde_json::to_value(&response)
                .map_err(|e| Status::internal(format!("failed to encode response: {e}")))?;
            Ok(RpcResponse::new(payload))
        })
    }
}

/// Wraps an async function as a [`Handler`].
///
/// ```
/// use meridian_core::{FnHandler, RequestContext, RpcResult};
/// use serde_json::Value;
///
/// let handler = FnHandler::new(|_ctx: &RequestContext, req: Value| async move {
///     RpcResult::Ok(req)
/// });
/// # let _ = handler;
/// ```
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F> {
    /// Creates a function-backed handler.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Fut, Req, Res> Handler<Req, Res> for FnHandler<F>
where
    F: Fn(&RequestContext, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Res, Status>> + Send,
    Req: DeserializeOwned + Send + 'static,
    Res: Serialize + Send + 'static,
{
    fn handle(
        &self,
        ctx: &RequestContext,
        request: Req,
    ) -> impl Future<Output = Result<Res, Status>> + Send {
        (self.func)(ctx, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusCode;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct EchoRequest {
        value: String,
    }

    #[derive(Serialize)]
    struct EchoResponse {
        value: String,
    }

    struct EchoHandler;

    impl Handler<EchoRequest, EchoResponse> for EchoHandler {
        async fn handle(
            &self,
            _ctx: &RequestContext,
            req: EchoRequest,
        ) -> Result<EchoResponse, Status> {
            Ok(EchoResponse { value: req.value })
        }
    }

    #[tokio::test]
    async fn typed_handler_round_trips_json() {
        let handler = TypedHandler::new(EchoHandler);
        let ctx = RequestContext::new();
        let invocation = Invocation::new("/test.v1.Echo/Echo", json!({"value": "hi"}));

        let response = handler.call(&ctx, invocation).await.expect("handler ok");
        assert_eq!(response.payload()["value"], "hi");
    }

    #[tokio::test]
    async fn typed_handler_rejects_malformed_payload() {
        let handler = TypedHandler::new(EchoHandler);
        let ctx = RequestContext::new();
        let invocation = Invocation::new("/test.v1.Echo/Echo", json!({"value": 42}));

        let err = handler.call(&ctx, invocation).await.unwrap_err();
        assert_eq!(err.code(), StatusCode::InvalidArgument);
    }

    #[tokio::test]
    async fn fn_handler_adapts_closures() {
        let handler = TypedHandler::new(FnHandler::new(
            |_ctx: &RequestContext, req: EchoRequest| async move {
                Ok(EchoResponse {
                    value: req.value.to_uppercase(),
                })
            },
        ));
        let ctx = RequestContext::new();
        let invocation = Invocation::new("/test.v1.Echo/Echo", json!({"value": "hi"}));

        let response = handler.call(&ctx, invocation).await.expect("handler ok");
        assert_eq!(response.payload()["value"], "HI");
    }
}
