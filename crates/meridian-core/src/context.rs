//! Per-request context threaded through the interceptor pipeline.

use crate::identity::RequestIdentity;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes request IDs naturally sortable in
/// logs and trace stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable per-call state enriched by the pipeline stages.
///
/// Each interceptor owns one narrow slice of this context: the correlator
/// sets the request ID, the tracing stage the trace/span IDs, the timeout
/// enforcer the deadline, and the authenticator the identity. The identity
/// slot is attach-once; later stages and handlers only read it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    identity: Option<RequestIdentity>,
    deadline: Option<Instant>,
    trace_id: Option<String>,
    span_id: Option<String>,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a context with a fresh request ID and no identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            identity: None,
            deadline: None,
            trace_id: None,
            span_id: None,
            started_at: Instant::now(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Replaces the request ID.
    ///
    /// Only the request-correlation interceptor should call this.
    pub fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = request_id;
    }

    /// Returns the authenticated identity, if the call passed authentication.
    #[must_use]
    pub fn identity(&self) -> Option<&RequestIdentity> {
        self.identity.as_ref()
    }

    /// Attaches the authenticated identity.
    ///
    /// The identity slot is write-once. A second attach indicates a pipeline
    /// wiring bug; it is rejected (debug builds assert).
    pub fn attach_identity(&mut self, identity: RequestIdentity) {
        debug_assert!(
            self.identity.is_none(),
            "request identity attached more than once"
        );
        if self.identity.is_none() {
            self.identity = Some(identity);
        }
    }

    /// Returns the call deadline, if one has been established.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Sets the call deadline.
    ///
    /// The timeout enforcer calls this only when the inbound call carried
    /// no deadline of its own.
    pub fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    /// Time remaining until the deadline, saturating at zero.
    #[must_use]
    pub fn remaining_time(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns the trace ID, if set.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Sets the trace ID. Only the tracing interceptor should call this.
    pub fn set_trace_id(&mut self, trace_id: String) {
        self.trace_id = Some(trace_id);
    }

    /// Returns the span ID, if set.
    #[must_use]
    pub fn span_id(&self) -> Option<&str> {
        self.span_id.as_deref()
    }

    /// Sets the span ID. Only the tracing interceptor should call this.
    pub fn set_span_id(&mut self, span_id: String) {
        self.span_id = Some(span_id);
    }

    /// When the request entered the pipeline.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Elapsed time since the request entered the pipeline.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::RequestIdentity;

    #[test]
    fn new_context_has_no_identity_and_no_deadline() {
        let ctx = RequestContext::new();
        assert!(ctx.identity().is_none());
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining_time().is_none());
    }

    #[test]
    fn identity_is_attach_once() {
        let mut ctx = RequestContext::new();
        ctx.attach_identity(RequestIdentity::new(
            "u-1",
            "alice",
            "alice@example.com",
            vec![],
            vec![],
        ));
        assert_eq!(ctx.identity().map(RequestIdentity::user_id), Some("u-1"));
    }

    #[test]
    fn deadline_and_remaining_time() {
        let mut ctx = RequestContext::new();
        ctx.set_deadline(Instant::now() + Duration::from_secs(30));
        let remaining = ctx.remaining_time().expect("deadline was set");
        assert!(remaining <= Duration::from_secs(30));
        assert!(remaining > Duration::from_secs(29));
    }

    #[test]
    fn remaining_time_saturates_at_zero() {
        let mut ctx = RequestContext::new();
        ctx.set_deadline(Instant::now() - Duration::from_secs(1));
        assert_eq!(ctx.remaining_time(), Some(Duration::ZERO));
    }

    #[test]
    fn request_id_round_trip() {
        let mut ctx = RequestContext::new();
        let id = RequestId::new();
        ctx.set_request_id(id);
        assert_eq!(ctx.request_id(), id);
    }

    #[test]
    fn request_ids_are_time_ordered() {
        let first = RequestId::new();
        std::thread::sleep(Duration::from_millis(2));
        let second = RequestId::new();
        assert!(first.as_uuid() < second.as_uuid());
    }
}
