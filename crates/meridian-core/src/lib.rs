//! Core types and traits for the Meridian backend.
//!
//! This crate defines the vocabulary shared by every other Meridian crate:
//!
//! - [`RequestContext`] and [`RequestId`] — per-call state threaded through
//!   the interceptor pipeline
//! - [`RequestIdentity`] — the immutable authenticated-caller bundle
//! - [`Status`] and [`StatusCode`] — the transport failure taxonomy and its
//!   HTTP status mapping
//! - [`MethodName`] — fully-qualified `/package.Service/Method` identifiers
//! - [`Invocation`], [`RpcResponse`], [`Metadata`] — the call envelope moved
//!   through the pipeline
//! - [`Handler`] / [`RpcHandler`] — typed and type-erased business handlers

pub mod context;
pub mod handler;
pub mod identity;
pub mod invocation;
pub mod method;
pub mod status;

pub use context::{RequestContext, RequestId};
pub use handler::{BoxFuture, FnHandler, Handler, RpcHandler, TypedHandler};
pub use identity::{RequestIdentity, SUPER_ADMIN_ROLE};
pub use invocation::{Invocation, Metadata, RpcResponse};
pub use method::{MethodName, HEALTH_PREFIX, REFLECTION_PREFIX};
pub use status::{Status, StatusCode};

/// Result type alias using [`Status`] as the error.
pub type RpcResult<T> = Result<T, Status>;
