//! Request metrics.
//!
//! Emits the standard series through the `metrics` facade: a request
//! counter labeled by method and outcome code, a duration histogram labeled
//! by method, and an in-flight gauge. The gauge uses a drop guard so it is
//! decremented even when a panic unwinds through this stage.

use crate::interceptor::{Interceptor, Next};
use meridian_core::{BoxFuture, Invocation, RequestContext, RpcResponse, Status, StatusCode};
use metrics::{counter, gauge, histogram};
use std::time::Instant;

/// Counter of completed requests, labeled `method` and `code`.
pub const REQUESTS_TOTAL: &str = "meridian_requests_total";
/// Histogram of request durations in seconds, labeled `method`.
pub const REQUEST_DURATION_SECONDS: &str = "meridian_request_duration_seconds";
/// Gauge of requests currently being processed.
pub const IN_FLIGHT_REQUESTS: &str = "meridian_in_flight_requests";

/// Records request counters, durations, and the in-flight gauge.
#[derive(Debug, Clone, Default)]
pub struct MetricsInterceptor;

impl MetricsInterceptor {
    /// Creates the metrics stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

struct InFlightGuard;

impl InFlightGuard {
    fn enter() -> Self {
        gauge!(IN_FLIGHT_REQUESTS).increment(1.0);
        Self
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(IN_FLIGHT_REQUESTS).decrement(1.0);
    }
}

impl Interceptor for MetricsInterceptor {
    fn name(&self) -> &'static str {
        "metrics"
    }

    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        invocation: Invocation,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>> {
        Box::pin(async move {
            let method = invocation.method().full().to_string();
            let _in_flight = InFlightGuard::enter();
            let start = Instant::now();

            let result = next.run(ctx, invocation).await;

            let elapsed = start.elapsed().as_secs_f64();
            let code = match &result {
                Ok(_) => StatusCode::Ok.as_str(),
                Err(status) => status.code().as_str(),
            };

            counter!(REQUESTS_TOTAL, "method" => method.clone(), "code" => code).increment(1);
            histogram!(REQUEST_DURATION_SECONDS, "method" => method).record(elapsed);

            result
        })
    }
}
