//! RPC dispatch and HTTP/JSON serving surface for the Meridian backend.
//!
//! The crate ties the pieces together at the transport boundary:
//!
//! - [`MethodRouter`] — fully-qualified method name → business handler
//! - [`RpcDispatcher`] — one interceptor-pipeline pass per inbound call
//! - [`RpcServer`] — the hyper-based `POST /<package.Service>/<Method>`
//!   surface with `GET /health` and `GET /ready` probes
//! - [`HealthService`] — per-service serving-status registry exposed as the
//!   health `Check` RPC
//! - [`ShutdownSignal`] / [`ConnectionTracker`] — signal-driven graceful
//!   drain

pub mod dispatch;
pub mod error;
pub mod health;
pub mod router;
pub mod server;
pub mod shutdown;

pub use dispatch::RpcDispatcher;
pub use error::ServerError;
pub use health::{HealthCheckRequest, HealthCheckResponse, HealthService, ServingStatus};
pub use router::MethodRouter;
pub use server::{RpcServer, RpcServerBuilder};
pub use shutdown::{ConnectionTracker, ShutdownSignal};
