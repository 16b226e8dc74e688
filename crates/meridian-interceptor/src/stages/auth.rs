//! Bearer-token authentication.
//!
//! Extracts and verifies the credential, consults the revocation store, and
//! attaches the immutable [`RequestIdentity`] for downstream stages. Public
//! methods (reserved namespaces plus the configured exact-match set) bypass
//! the stage entirely.
//!
//! The revocation lookup is the only blocking I/O in the pipeline; it runs
//! under a budget clamped to the call's remaining deadline so a slow store
//! degrades latency but never hangs the call. Store failures follow the
//! configured [`RevocationPolicy`].
//!
//! [`RequestIdentity`]: meridian_core::RequestIdentity

use crate::interceptor::{Interceptor, Next};
use meridian_auth::{
    PublicMethods, RevocationPolicy, TokenBlacklistChecker, TokenVerifier,
};
use meridian_core::{BoxFuture, Invocation, Metadata, RequestContext, RpcResponse, Status};
use std::sync::Arc;
use std::time::Duration;

/// Metadata key carrying the bearer credential.
pub const AUTHORIZATION_METADATA: &str = "authorization";

const BEARER_PREFIX: &str = "Bearer ";

/// Default budget for one revocation-store lookup.
pub const DEFAULT_REVOCATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Validates bearer credentials and attaches the request identity.
pub struct AuthInterceptor {
    verifier: TokenVerifier,
    blacklist: Option<Arc<dyn TokenBlacklistChecker>>,
    revocation_policy: RevocationPolicy,
    revocation_timeout: Duration,
    public: PublicMethods,
}

impl AuthInterceptor {
    /// Creates the stage with no revocation checking.
    #[must_use]
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            verifier,
            blacklist: None,
            revocation_policy: RevocationPolicy::default(),
            revocation_timeout: DEFAULT_REVOCATION_TIMEOUT,
            public: PublicMethods::new(),
        }
    }

    /// Wires the revocation-store collaborator and its failure policy.
    #[must_use]
    pub fn with_blacklist(
        mut self,
        blacklist: Arc<dyn TokenBlacklistChecker>,
        policy: RevocationPolicy,
    ) -> Self {
        self.blacklist = Some(blacklist);
        self.revocation_policy = policy;
        self
    }

    /// Overrides the revocation lookup budget.
    #[must_use]
    pub fn with_revocation_timeout(mut self, timeout: Duration) -> Self {
        self.revocation_timeout = timeout;
        self
    }

    /// Adds exact-match public methods on top of the reserved namespaces.
    #[must_use]
    pub fn with_public_methods(mut self, public: PublicMethods) -> Self {
        self.public = public;
        self
    }

    async fn check_revocation(&self, ctx: &RequestContext, token_id: &str) -> Result<(), Status> {
        let Some(blacklist) = &self.blacklist else {
            return Ok(());
        };
        if token_id.is_empty() {
            return Ok(());
        }

        let budget = ctx
            .remaining_time()
            .map_or(self.revocation_timeout, |remaining| {
                remaining.min(self.revocation_timeout)
            });

        let outcome = tokio::time::timeout(budget, blacklist.is_blacklisted(token_id)).await;
        match outcome {
            Ok(Ok(true)) => Err(Status::unauthenticated("token has been revoked")),
            Ok(Ok(false)) => Ok(()),
            Ok(Err(err)) => self.handle_store_failure(&err.to_string()),
            Err(_) => self.handle_store_failure("blacklist lookup timed out"),
        }
    }

    fn handle_store_failure(&self, detail: &str) -> Result<(), Status> {
        match self.revocation_policy {
            RevocationPolicy::FailOpen => {
                // Short access-token lifetimes bound the exposure window.
                tracing::warn!(error = detail, "failed to check token blacklist");
                Ok(())
            }
            RevocationPolicy::FailClosed => {
                tracing::warn!(error = detail, "rejecting call: revocation unverifiable");
                Err(Status::unauthenticated("unable to verify token revocation"))
            }
        }
    }
}

impl std::fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterceptor")
            .field("revocation_policy", &self.revocation_policy)
            .field("revocation_timeout", &self.revocation_timeout)
            .field("has_blacklist", &self.blacklist.is_some())
            .finish_non_exhaustive()
    }
}

fn extract_bearer(metadata: &Metadata) -> Result<&str, &'static str> {
    let header = metadata
        .get(AUTHORIZATION_METADATA)
        .ok_or("no authorization header")?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or("invalid authorization format")?;
    if token.is_empty() {
        return Err("empty token");
    }
    Ok(token)
}

impl Interceptor for AuthInterceptor {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        invocation: Invocation,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<RpcResponse, Status>> {
        Box::pin(async move {
            if self.public.is_public(invocation.method()) {
                return next.run(ctx, invocation).await;
            }

            let token = extract_bearer(invocation.metadata()).map_err(|detail| {
                Status::unauthenticated(format!("missing or invalid authorization: {detail}"))
            })?;

            let claims = self
                .verifier
                .verify(token)
                .map_err(|err| Status::unauthenticated(format!("invalid token: {err}")))?;

            self.check_revocation(ctx, &claims.jti).await?;

            ctx.attach_identity(claims.identity());
            next.run(ctx, invocation).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_auth::{AccessClaims, BlacklistError, StaticBlacklist, TOKEN_TYPE_ACCESS};
    use meridian_core::StatusCode;
    use serde_json::json;

    const SECRET: &str = "interceptor-test-secret";

    fn sign(claims: &AccessClaims) -> String {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            claims,
            &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("signing test token")
    }

    fn claims(jti: &str) -> AccessClaims {
        AccessClaims {
            iss: "test-issuer".to_string(),
            sub: "u-1".to_string(),
            exp: jsonwebtoken::get_current_timestamp() + 900,
            iat: jsonwebtoken::get_current_timestamp(),
            jti: jti.to_string(),
            token_type: TOKEN_TYPE_ACCESS.to_string(),
            user_id: "u-1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            roles: vec!["ADMIN".to_string()],
            permissions: vec![],
        }
    }

    fn invocation_with_token(method: &str, token: Option<&str>) -> Invocation {
        let mut metadata = Metadata::new();
        if let Some(token) = token {
            metadata.insert(AUTHORIZATION_METADATA, format!("Bearer {token}"));
        }
        Invocation::new(method, json!({})).with_metadata(metadata)
    }

    fn identity_probe() -> Next<'static> {
        Next::handler(|ctx, _inv| {
            let user = ctx
                .identity()
                .map(|id| id.user_id().to_string())
                .unwrap_or_default();
            Box::pin(async move { Ok(RpcResponse::new(json!({ "user": user }))) })
        })
    }

    struct FailingBlacklist;

    impl TokenBlacklistChecker for FailingBlacklist {
        fn is_blacklisted<'a>(
            &'a self,
            _token_id: &'a str,
        ) -> BoxFuture<'a, Result<bool, BlacklistError>> {
            Box::pin(async { Err(BlacklistError::new("connection refused")) })
        }
    }

    #[tokio::test]
    async fn health_methods_bypass_authentication() {
        let stage = AuthInterceptor::new(TokenVerifier::new(SECRET));
        let mut ctx = RequestContext::new();

        for method in [
            "/grpc.health.v1.Health/Check",
            "/grpc.health.v1.Health/Watch",
            "/grpc.reflection.v1alpha.ServerReflection/ServerReflectionInfo",
        ] {
            let result = stage
                .call(
                    &mut ctx,
                    invocation_with_token(method, None),
                    identity_probe(),
                )
                .await;
            assert!(result.is_ok(), "method {method}");
        }
    }

    #[tokio::test]
    async fn missing_token_is_unauthenticated() {
        let stage = AuthInterceptor::new(TokenVerifier::new(SECRET));
        let mut ctx = RequestContext::new();

        let err = stage
            .call(
                &mut ctx,
                invocation_with_token("/masterdata.v1.CategoryService/ListCategories", None),
                identity_probe(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), StatusCode::Unauthenticated);
        assert_eq!(
            err.message(),
            "missing or invalid authorization: no authorization header"
        );
    }

    #[tokio::test]
    async fn malformed_header_is_unauthenticated() {
        let stage = AuthInterceptor::new(TokenVerifier::new(SECRET));
        let mut ctx = RequestContext::new();

        let mut metadata = Metadata::new();
        metadata.insert(AUTHORIZATION_METADATA, "Token abc");
        let invocation =
            Invocation::new("/iam.v1.UserService/GetUser", json!({})).with_metadata(metadata);

        let err = stage
            .call(&mut ctx, invocation, identity_probe())
            .await
            .unwrap_err();
        assert_eq!(err.code(), StatusCode::Unauthenticated);
        assert!(err.message().contains("invalid authorization format"));
    }

    #[tokio::test]
    async fn valid_token_attaches_identity() {
        let stage = AuthInterceptor::new(TokenVerifier::new(SECRET));
        let mut ctx = RequestContext::new();
        let token = sign(&claims("jti-1"));

        let response = stage
            .call(
                &mut ctx,
                invocation_with_token("/iam.v1.UserService/GetUser", Some(&token)),
                identity_probe(),
            )
            .await
            .unwrap();

        assert_eq!(response.payload()["user"], "u-1");
        assert_eq!(
            ctx.identity().map(|id| id.username()),
            Some("alice")
        );
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() {
        let blacklist = Arc::new(StaticBlacklist::new());
        blacklist.revoke("jti-revoked");

        let stage = AuthInterceptor::new(TokenVerifier::new(SECRET))
            .with_blacklist(blacklist, RevocationPolicy::FailOpen);
        let mut ctx = RequestContext::new();
        let token = sign(&claims("jti-revoked"));

        let err = stage
            .call(
                &mut ctx,
                invocation_with_token("/iam.v1.UserService/GetUser", Some(&token)),
                identity_probe(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), StatusCode::Unauthenticated);
        assert_eq!(err.message(), "token has been revoked");
    }

    #[tokio::test]
    async fn failing_store_is_fail_open_by_default() {
        let stage = AuthInterceptor::new(TokenVerifier::new(SECRET))
            .with_blacklist(Arc::new(FailingBlacklist), RevocationPolicy::FailOpen);
        let mut ctx = RequestContext::new();
        let token = sign(&claims("jti-1"));

        let response = stage
            .call(
                &mut ctx,
                invocation_with_token("/iam.v1.UserService/GetUser", Some(&token)),
                identity_probe(),
            )
            .await
            .unwrap();
        assert_eq!(response.payload()["user"], "u-1");
    }

    #[tokio::test]
    async fn failing_store_rejects_when_fail_closed() {
        let stage = AuthInterceptor::new(TokenVerifier::new(SECRET))
            .with_blacklist(Arc::new(FailingBlacklist), RevocationPolicy::FailClosed);
        let mut ctx = RequestContext::new();
        let token = sign(&claims("jti-1"));

        let err = stage
            .call(
                &mut ctx,
                invocation_with_token("/iam.v1.UserService/GetUser", Some(&token)),
                identity_probe(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), StatusCode::Unauthenticated);
        assert_eq!(err.message(), "unable to verify token revocation");
    }

    #[tokio::test]
    async fn tokens_without_jti_skip_the_revocation_check() {
        // A failing store must not matter when there is no token ID to look up.
        let stage = AuthInterceptor::new(TokenVerifier::new(SECRET))
            .with_blacklist(Arc::new(FailingBlacklist), RevocationPolicy::FailClosed);
        let mut ctx = RequestContext::new();
        let token = sign(&claims(""));

        let result = stage
            .call(
                &mut ctx,
                invocation_with_token("/iam.v1.UserService/GetUser", Some(&token)),
                identity_probe(),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn configured_public_methods_skip_authentication() {
        let public = PublicMethods::from_methods(["/iam.v1.AuthService/Login"]);
        let stage =
            AuthInterceptor::new(TokenVerifier::new(SECRET)).with_public_methods(public);
        let mut ctx = RequestContext::new();

        let result = stage
            .call(
                &mut ctx,
                invocation_with_token("/iam.v1.AuthService/Login", None),
                identity_probe(),
            )
            .await;
        assert!(result.is_ok());
    }
}
