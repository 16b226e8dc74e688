//! The HTTP/JSON serving surface.
//!
//! RPC calls arrive as `POST /<package.Service>/<Method>` with a JSON body;
//! request headers become call metadata and the dispatcher runs the full
//! interceptor pipeline. Enveloped results come back as `200` with the
//! method's response message; failures the envelope could not resolve map
//! the transport status to its HTTP code with a small JSON error body.
//! `GET /health` and `GET /ready` serve liveness and readiness probes.

use crate::dispatch::RpcDispatcher;
use crate::error::ServerError;
use crate::health::{HealthService, ServingStatus};
use crate::router::MethodRouter;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use meridian_core::{Invocation, Metadata, RequestContext, Status};
use meridian_interceptor::InterceptorPipeline;
use meridian_interceptor::stages::REQUEST_ID_METADATA;
use meridian_proto::ResponseCatalog;
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Response body type of the serving surface.
pub type ResponseBody = Full<Bytes>;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// The Meridian RPC server.
pub struct RpcServer {
    addr: SocketAddr,
    shutdown_grace: Duration,
    inner: Arc<ServerInner>,
}

struct ServerInner {
    dispatcher: RpcDispatcher,
    health: Arc<HealthService>,
    request_timeout: Duration,
}

impl RpcServer {
    /// Starts building a server.
    #[must_use]
    pub fn builder() -> RpcServerBuilder {
        RpcServerBuilder::new()
    }

    /// The address the server will bind.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The health registry, for marking services (not) serving.
    #[must_use]
    pub fn health(&self) -> &Arc<HealthService> {
        &self.inner.health
    }

    /// Serves until SIGTERM/SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals())
            .await
    }

    /// Serves until the given signal triggers, then drains gracefully.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;
        tracing::info!(addr = %self.addr, "rpc server listening");

        let tracker = ConnectionTracker::new();
        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        let inner = Arc::clone(&self.inner);
                        let token = tracker.acquire();
                        let conn_shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            let io = TokioIo::new(stream);
                            let service = service_fn(move |req: Request<Incoming>| {
                                let inner = Arc::clone(&inner);
                                async move { Ok::<_, Infallible>(inner.handle(req).await) }
                            });
                            let conn = http1::Builder::new().serve_connection(io, service);
                            tokio::select! {
                                result = conn => {
                                    if let Err(err) = result {
                                        tracing::debug!(remote = %remote, error = %err, "connection error");
                                    }
                                }
                                () = conn_shutdown.recv() => {}
                            }
                            drop(token);
                        });
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to accept connection");
                    }
                },
                () = shutdown.recv() => break,
            }
        }

        // Fail readiness probes while the drain runs.
        self.inner.health.set_not_serving("");
        tracing::info!(
            in_flight = tracker.active_connections(),
            grace = ?self.shutdown_grace,
            "draining connections"
        );
        tokio::select! {
            () = tracker.drained() => {
                tracing::info!("all connections closed");
            }
            () = tokio::time::sleep(self.shutdown_grace) => {
                tracing::warn!(
                    in_flight = tracker.active_connections(),
                    "shutdown grace period elapsed"
                );
            }
        }

        tracing::info!("rpc server stopped");
        Ok(())
    }
}

impl std::fmt::Debug for RpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcServer")
            .field("addr", &self.addr)
            .field("dispatcher", &self.inner.dispatcher)
            .finish_non_exhaustive()
    }
}

impl ServerInner {
    async fn handle<B>(&self, req: Request<B>) -> Response<ResponseBody>
    where
        B: hyper::body::Body<Data = Bytes> + Send,
        B::Error: std::fmt::Display,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        match (method.as_str(), path.as_str()) {
            ("GET", "/health") => return self.liveness(),
            ("GET", "/ready") => return self.readiness(),
            _ => {}
        }

        if method != Method::POST {
            return json_response(
                StatusCode::METHOD_NOT_ALLOWED,
                &json!({
                    "code": "InvalidArgument",
                    "message": "rpc calls must use POST",
                }),
                None,
            );
        }

        let metadata: Metadata = req
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|value| (name.as_str(), value))
            })
            .collect();

        let body = match tokio::time::timeout(self.request_timeout, collect_body(req)).await {
            Ok(Ok(body)) => body,
            Ok(Err(message)) => {
                tracing::warn!(method = %path, error = %message, "failed to read request body");
                return json_response(
                    StatusCode::BAD_REQUEST,
                    &json!({
                        "code": "InvalidArgument",
                        "message": format!("failed to read request body: {message}"),
                    }),
                    None,
                );
            }
            Err(_) => {
                return json_response(
                    StatusCode::REQUEST_TIMEOUT,
                    &json!({
                        "code": "DeadlineExceeded",
                        "message": "timed out reading request body",
                    }),
                    None,
                );
            }
        };

        let payload = if body.is_empty() {
            json!({})
        } else {
            match serde_json::from_slice(&body) {
                Ok(payload) => payload,
                Err(err) => {
                    return json_response(
                        StatusCode::BAD_REQUEST,
                        &json!({
                            "code": "InvalidArgument",
                            "message": format!("malformed JSON body: {err}"),
                        }),
                        None,
                    );
                }
            }
        };

        let invocation = Invocation::new(path.as_str(), payload).with_metadata(metadata);
        let (ctx, result) = self.dispatcher.dispatch(invocation).await;

        match result {
            Ok(response) => {
                let request_id = response
                    .metadata()
                    .get(REQUEST_ID_METADATA)
                    .map(str::to_string)
                    .unwrap_or_else(|| ctx.request_id().to_string());
                json_response(StatusCode::OK, response.payload(), Some(&request_id))
            }
            Err(status) => self.status_response(&ctx, &status),
        }
    }

    fn liveness(&self) -> Response<ResponseBody> {
        json_response(StatusCode::OK, &json!({"status": "healthy"}), None)
    }

    fn readiness(&self) -> Response<ResponseBody> {
        let ready = self.health.overall() == ServingStatus::Serving;
        let code = if ready {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        json_response(code, &json!({ "ready": ready }), None)
    }

    fn status_response(&self, ctx: &RequestContext, status: &Status) -> Response<ResponseBody> {
        let code = StatusCode::from_u16(status.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        json_response(
            code,
            &json!({
                "code": status.code().as_str(),
                "message": status.message(),
            }),
            Some(&ctx.request_id().to_string()),
        )
    }
}

async fn collect_body<B>(req: Request<B>) -> Result<Bytes, String>
where
    B: hyper::body::Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    req.into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|err| err.to_string())
}

fn json_response(
    code: StatusCode,
    body: &serde_json::Value,
    request_id: Option<&str>,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(code)
        .header("content-type", "application/json");
    if let Some(request_id) = request_id {
        builder = builder.header(REQUEST_ID_METADATA, request_id);
    }
    builder
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("{}"))))
}

/// Builds an [`RpcServer`].
pub struct RpcServerBuilder {
    rpc_addr: String,
    request_timeout: Duration,
    shutdown_grace: Duration,
    router: MethodRouter,
    pipeline: Option<InterceptorPipeline>,
    health: Option<Arc<HealthService>>,
}

impl RpcServerBuilder {
    fn new() -> Self {
        Self {
            rpc_addr: "0.0.0.0:8080".to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            router: MethodRouter::new(),
            pipeline: None,
            health: None,
        }
    }

    /// Sets the listen address.
    #[must_use]
    pub fn rpc_addr(mut self, addr: impl Into<String>) -> Self {
        self.rpc_addr = addr.into();
        self
    }

    /// Sets the budget for reading one request body.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the drain budget for in-flight connections at shutdown.
    #[must_use]
    pub fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Supplies the routing table.
    #[must_use]
    pub fn router(mut self, router: MethodRouter) -> Self {
        self.router = router;
        self
    }

    /// Supplies the assembled interceptor pipeline.
    ///
    /// When omitted, a bare pipeline over the standard response catalog is
    /// used (no rate limiting, no authentication).
    #[must_use]
    pub fn pipeline(mut self, pipeline: InterceptorPipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Supplies a shared health registry.
    #[must_use]
    pub fn health(mut self, health: Arc<HealthService>) -> Self {
        self.health = Some(health);
        self
    }

    /// Validates the address and assembles the server.
    ///
    /// The health `Check` handler is registered on the routing table here.
    pub fn build(self) -> Result<RpcServer, ServerError> {
        let addr: SocketAddr =
            self.rpc_addr
                .parse()
                .map_err(|err: std::net::AddrParseError| ServerError::InvalidAddress {
                    addr: self.rpc_addr.clone(),
                    message: err.to_string(),
                })?;

        let health = self.health.unwrap_or_else(|| Arc::new(HealthService::new()));
        let mut router = self.router;
        health.register(&mut router);

        let pipeline = self.pipeline.unwrap_or_else(|| {
            InterceptorPipeline::builder(Arc::new(ResponseCatalog::with_standard_services()))
                .build()
        });

        Ok(RpcServer {
            addr,
            shutdown_grace: self.shutdown_grace,
            inner: Arc::new(ServerInner {
                dispatcher: RpcDispatcher::new(router, pipeline),
                health,
                request_timeout: self.request_timeout,
            }),
        })
    }
}

impl Default for RpcServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
