//! The Meridian backend server binary.
//!
//! Startup order: environment and configuration, telemetry, then the
//! response catalog, interceptor pipeline, and routing table, served until
//! SIGTERM/SIGINT with a graceful drain.

mod services;

use anyhow::Context;
use meridian_auth::{PublicMethods, RevocationPolicy, StaticBlacklist, TokenVerifier};
use meridian_config::{ConfigLoader, MeridianConfig, ENV_PREFIX};
use meridian_interceptor::stages::{standard_method_limits, AuthInterceptor, RateLimiter};
use meridian_interceptor::InterceptorPipeline;
use meridian_proto::ResponseCatalog;
use meridian_server::{HealthService, MethodRouter, RpcServer};
use meridian_telemetry::init_telemetry;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path =
        std::env::var("MERIDIAN_CONFIG").unwrap_or_else(|_| "meridian.toml".to_string());
    let config = ConfigLoader::new()
        .with_dotenv()
        .with_optional_file(&config_path)
        .with_context(|| format!("loading {config_path}"))?
        .with_env_prefix(ENV_PREFIX)
        .load()
        .context("loading configuration")?;

    let telemetry =
        init_telemetry(&config.telemetry_config()).context("initializing telemetry")?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        rpc_addr = %config.server.rpc_addr,
        "starting meridiand"
    );

    let pipeline = build_pipeline(&config);

    let mut router = MethodRouter::new();
    let categories = Arc::new(services::CategoryStore::new());
    let users = Arc::new(services::UserStore::new());
    services::register(&mut router, &categories, &users);

    let health = Arc::new(HealthService::new());
    health.set_serving("masterdata.v1.CategoryService");
    health.set_serving("iam.v1.UserService");

    let server = RpcServer::builder()
        .rpc_addr(&config.server.rpc_addr)
        .request_timeout(Duration::from_secs(config.server.request_timeout_secs))
        .shutdown_grace(Duration::from_secs(config.server.shutdown_grace_secs))
        .router(router)
        .pipeline(pipeline)
        .health(health)
        .build()
        .context("building rpc server")?;

    server.run().await.context("serving")?;

    telemetry.shutdown();
    Ok(())
}

fn build_pipeline(config: &MeridianConfig) -> InterceptorPipeline {
    let catalog = Arc::new(ResponseCatalog::with_standard_services());
    let limiter = Arc::new(
        RateLimiter::new(config.rate_limit.requests_per_second)
            .with_method_limits(standard_method_limits()),
    );

    let mut builder = InterceptorPipeline::builder(catalog)
        .default_timeout(Duration::from_secs(config.server.request_timeout_secs))
        .rate_limiter(limiter);

    if config.auth.enabled {
        let mut auth = AuthInterceptor::new(TokenVerifier::new(&config.auth.token_secret))
            .with_public_methods(PublicMethods::from_methods(
                config.auth.public_methods.iter().cloned(),
            ));
        if config.auth.revocation.enabled {
            let policy = if config.auth.revocation.fail_closed {
                RevocationPolicy::FailClosed
            } else {
                RevocationPolicy::FailOpen
            };
            // Process-local store; production deployments swap in the
            // shared revocation store used by the identity service.
            auth = auth
                .with_blacklist(Arc::new(StaticBlacklist::new()), policy)
                .with_revocation_timeout(Duration::from_millis(
                    config.auth.revocation.check_timeout_ms,
                ));
        }
        builder = builder.authentication(auth);
    } else {
        tracing::warn!("authentication is disabled; every method is public");
    }

    builder.build()
}
