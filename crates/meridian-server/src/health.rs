//! Health service.
//!
//! Tracks a serving status per registered service, plus the empty-string
//! entry for the server as a whole. The `Check` method is served like any
//! other RPC but is exempt from authentication by its reserved namespace.

use crate::router::MethodRouter;
use meridian_core::{Handler, RequestContext, RpcResult, Status, TypedHandler};
use meridian_proto::methods;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Whether a service is accepting traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServingStatus {
    /// The service is healthy and accepting requests.
    Serving,
    /// The service is registered but not accepting requests.
    NotServing,
}

/// Request for a health check; an empty service name means the whole server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthCheckRequest {
    /// The service to check, or empty for the overall status.
    #[serde(default)]
    pub service: String,
}

/// Health check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// The requested service's status.
    pub status: ServingStatus,
}

/// Per-service serving-status registry.
#[derive(Debug)]
pub struct HealthService {
    statuses: RwLock<HashMap<String, ServingStatus>>,
}

impl HealthService {
    /// Creates the registry with the overall server marked serving.
    #[must_use]
    pub fn new() -> Self {
        let mut statuses = HashMap::new();
        statuses.insert(String::new(), ServingStatus::Serving);
        Self {
            statuses: RwLock::new(statuses),
        }
    }

    /// Marks a service as serving.
    pub fn set_serving(&self, service: impl Into<String>) {
        self.statuses
            .write()
            .insert(service.into(), ServingStatus::Serving);
    }

    /// Marks a service as not serving.
    pub fn set_not_serving(&self, service: impl Into<String>) {
        self.statuses
            .write()
            .insert(service.into(), ServingStatus::NotServing);
    }

    /// Looks up a service's status; `None` for unregistered services.
    #[must_use]
    pub fn check(&self, service: &str) -> Option<ServingStatus> {
        self.statuses.read().get(service).copied()
    }

    /// The overall server status (the empty-string entry).
    #[must_use]
    pub fn overall(&self) -> ServingStatus {
        self.check("").unwrap_or(ServingStatus::NotServing)
    }

    /// Registers the `Check` handler on the router.
    pub fn register(self: &Arc<Self>, router: &mut MethodRouter) {
        router.register(
            methods::health::CHECK,
            TypedHandler::new(HealthCheckHandler {
                service: Arc::clone(self),
            }),
        );
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}

struct HealthCheckHandler {
    service: Arc<HealthService>,
}

impl Handler<HealthCheckRequest, HealthCheckResponse> for HealthCheckHandler {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        req: HealthCheckRequest,
    ) -> RpcResult<HealthCheckResponse> {
        match self.service.check(&req.service) {
            Some(status) => Ok(HealthCheckResponse { status }),
            None => Err(Status::not_found(format!(
                "unknown service: {}",
                req.service
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::{Invocation, StatusCode};
    use serde_json::json;

    #[test]
    fn overall_status_starts_serving() {
        let health = HealthService::new();
        assert_eq!(health.overall(), ServingStatus::Serving);
        assert_eq!(health.check(""), Some(ServingStatus::Serving));
    }

    #[test]
    fn per_service_status_transitions() {
        let health = HealthService::new();
        health.set_serving("masterdata.v1.CategoryService");
        assert_eq!(
            health.check("masterdata.v1.CategoryService"),
            Some(ServingStatus::Serving)
        );

        health.set_not_serving("masterdata.v1.CategoryService");
        assert_eq!(
            health.check("masterdata.v1.CategoryService"),
            Some(ServingStatus::NotServing)
        );

        assert_eq!(health.check("iam.v1.UserService"), None);
    }

    #[test]
    fn serving_status_wire_form_is_screaming_snake() {
        assert_eq!(
            serde_json::to_value(ServingStatus::Serving).unwrap(),
            json!("SERVING")
        );
        assert_eq!(
            serde_json::to_value(ServingStatus::NotServing).unwrap(),
            json!("NOT_SERVING")
        );
    }

    #[tokio::test]
    async fn check_handler_reports_status_and_unknowns() {
        let health = Arc::new(HealthService::new());
        health.set_serving("iam.v1.UserService");

        let mut router = MethodRouter::new();
        health.register(&mut router);
        let handler = router.get(methods::health::CHECK).expect("registered");
        let ctx = RequestContext::new();

        let response = handler
            .call(
                &ctx,
                Invocation::new(methods::health::CHECK, json!({"service": ""})),
            )
            .await
            .expect("overall check succeeds");
        assert_eq!(response.payload()["status"], "SERVING");

        let err = handler
            .call(
                &ctx,
                Invocation::new(
                    methods::health::CHECK,
                    json!({"service": "billing.v1.InvoiceService"}),
                ),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), StatusCode::NotFound);
    }
}
