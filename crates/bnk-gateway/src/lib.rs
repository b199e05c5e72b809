//! # bnk-gateway — Authenticating Edge Gateway
//!
//! The single public entry point. Routes by path prefix:
//!
//! | Prefix | Upstream | Bearer filter |
//! |--------|----------|---------------|
//! | `/auth/**` | auth service | no |
//! | `/bank/**` | bank service | yes |
//! | `/accounts/**` | account service | yes |
//! | `/health/*`, `/metrics` | answered here | no |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → [AuthFilter, protected routes only] → Proxy
//! ```
//!
//! The gateway holds a [`bnk_token::TokenValidator`] and nothing else from
//! the token protocol. It cannot issue tokens.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod proxy;

use axum::middleware::from_fn;
use axum::routing::{any, get};
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::auth::AuthFilter;
use crate::config::GatewayConfig;
use crate::metrics::ApiMetrics;
use crate::proxy::Proxy;

/// Everything the gateway router needs.
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub proxy: Proxy,
    pub filter: AuthFilter,
    pub metrics: ApiMetrics,
}

impl GatewayState {
    /// Build state from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            proxy: Proxy::new(config.upstreams.clone(), config.upstream_timeout)?,
            filter: AuthFilter {
                validator: config.tokens.validator(),
            },
            metrics: ApiMetrics::new(),
        })
    }
}

/// Assemble the gateway router.
pub fn app(state: GatewayState) -> Router {
    let protected = Router::new()
        .route("/bank", any(proxy::to_bank))
        .route("/bank/*rest", any(proxy::to_bank))
        .route("/accounts", any(proxy::to_accounts))
        .route("/accounts/*rest", any(proxy::to_accounts))
        .route_layer(from_fn(auth::auth_filter));

    let open = Router::new()
        .route("/auth", any(proxy::to_auth))
        .route("/auth/*rest", any(proxy::to_auth))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(metrics::metrics_handler));

    Router::new()
        .merge(protected)
        .merge(open)
        .layer(from_fn(metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state.filter))
        .layer(Extension(state.metrics))
        .with_state(state.proxy)
}

/// Liveness probe. 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. The validator is built before the router exists.
async fn readiness() -> &'static str {
    "ready"
}
