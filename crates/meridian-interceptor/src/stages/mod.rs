//! The individual pipeline stages.

pub mod auth;
pub mod authz;
pub mod envelope;
pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod recovery;
pub mod request_id;
pub mod timeout;
pub mod tracing;

pub use self::auth::{AuthInterceptor, AUTHORIZATION_METADATA, DEFAULT_REVOCATION_TIMEOUT};
pub use self::authz::PermissionInterceptor;
pub use self::envelope::EnvelopeInterceptor;
pub use self::logging::LoggingInterceptor;
pub use self::metrics::MetricsInterceptor;
pub use self::rate_limit::{standard_method_limits, RateLimitInterceptor, RateLimiter};
pub use self::recovery::RecoveryInterceptor;
pub use self::request_id::{RequestIdInterceptor, REQUEST_ID_METADATA};
pub use self::timeout::{TimeoutInterceptor, DEFAULT_TIMEOUT};
pub use self::tracing::{TracingInterceptor, TRACEPARENT_METADATA};
