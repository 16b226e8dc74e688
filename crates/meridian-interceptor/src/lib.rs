//! The fixed-order request-processing pipeline.
//!
//! Every inbound call — regardless of service — passes through the same
//! ordered set of cross-cutting interceptors before reaching business
//! logic: error enveloping, panic recovery, request correlation, tracing,
//! metrics, rate limiting, logging, deadline enforcement, and (for
//! credentialed deployments) authentication and authorization.
//!
//! See [`pipeline::InterceptorPipeline`] for the composition rules and
//! [`stages`] for the individual stage contracts.

pub mod interceptor;
pub mod pipeline;
pub mod stages;

pub use interceptor::{Interceptor, Next};
pub use pipeline::{InterceptorPipeline, PipelineBuilder};
