//! Request correlation.
//!
//! Every call gets a request ID: propagated from `x-request-id` metadata
//! when the caller supplied a valid one, freshly generated (UUID v7)
//! otherwise. The ID is stored in the context for every downstream stage
//! and echoed back on the response metadata.

use crate::interceptor::{Interceptor, Next};
use meridian_core::{BoxFuture, Invocation, RequestContext, RequestId, RpcResponse, Status};
use uuid::Uuid;

/// Metadata key for request ID propagation.
pub const REQUEST_ID_METADATA: &str = "x-request-id";

/// Attaches or propagates the per-call request identifier.
#[derive(Debug, Clone)]
pub struct RequestIdInterceptor {
    /// Whether to honor caller-supplied `x-request-id` values.
    ///
    /// Internal service-to-service traffic propagates IDs; edge deployments
    /// that distrust callers can force generation.
    trust_incoming: bool,
}

impl RequestIdInterceptor {
    /// Creates the stage, trusting caller-supplied IDs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trust_incoming: true,
        }
    }

    /// Creates a stage that always generates a fresh ID.
    #[must_use]
    pub fn generate_only() -> Self {
        Self {
            trust_incoming: false,
        }
    }

    fn incoming_id(&self, invocation: &Invocation) -> Option<RequestId> {
        if !self.trust_incoming {
            return None;
        }
        invocation
            .metadata()
            .get(REQUEST_ID_METADATA)
            .and_then(|value| Uuid::parse_str(value).ok())
            .map(RequestId::from_uuid)
    }
}

impl Default for RequestIdInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Interceptor for RequestIdInterceptor {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        invocation: Invocation,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>> {
        Box::pin(async move {
            let request_id = self.incoming_id(&invocation).unwrap_or_else(RequestId::new);
            ctx.set_request_id(request_id);

            let mut response = next.run(ctx, invocation).await?;
            response
                .metadata_mut()
                .insert(REQUEST_ID_METADATA, request_id.to_string());
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::Metadata;
    use serde_json::json;

    fn echo_id_handler() -> Next<'static> {
        Next::handler(|ctx, _inv| {
            let id = ctx.request_id();
            Box::pin(async move { Ok(RpcResponse::new(json!({ "seen": id.to_string() }))) })
        })
    }

    #[tokio::test]
    async fn propagates_valid_incoming_id() {
        let stage = RequestIdInterceptor::new();
        let mut ctx = RequestContext::new();
        let incoming = Uuid::now_v7().to_string();
        let metadata: Metadata = [(REQUEST_ID_METADATA, incoming.clone())].into_iter().collect();
        let invocation = Invocation::new("/test.v1.Svc/Do", json!({})).with_metadata(metadata);

        let response = stage.call(&mut ctx, invocation, echo_id_handler()).await.unwrap();
        assert_eq!(response.payload()["seen"], incoming);
        assert_eq!(response.metadata().get(REQUEST_ID_METADATA), Some(incoming.as_str()));
    }

    #[tokio::test]
    async fn generates_when_missing_or_invalid() {
        let stage = RequestIdInterceptor::new();
        let mut ctx = RequestContext::new();
        let metadata: Metadata = [(REQUEST_ID_METADATA, "not-a-uuid")].into_iter().collect();
        let invocation = Invocation::new("/test.v1.Svc/Do", json!({})).with_metadata(metadata);

        let response = stage.call(&mut ctx, invocation, echo_id_handler()).await.unwrap();
        let echoed = response.metadata().get(REQUEST_ID_METADATA).unwrap();
        assert!(Uuid::parse_str(echoed).is_ok());
        assert_ne!(echoed, "not-a-uuid");
    }

    #[tokio::test]
    async fn generate_only_ignores_incoming() {
        let stage = RequestIdInterceptor::generate_only();
        let mut ctx = RequestContext::new();
        let incoming = Uuid::now_v7().to_string();
        let metadata: Metadata = [(REQUEST_ID_METADATA, incoming.clone())].into_iter().collect();
        let invocation = Invocation::new("/test.v1.Svc/Do", json!({})).with_metadata(metadata);

        let response = stage.call(&mut ctx, invocation, echo_id_handler()).await.unwrap();
        assert_ne!(response.metadata().get(REQUEST_ID_METADATA), Some(incoming.as_str()));
    }
}
