//! # bnk-auth-service — Credentials and Bearer Tokens
//!
//! Registers users, exchanges a username and password for a signed bearer
//! token, and answers whether a token is currently valid. The gateway does
//! not call this service to check tokens; it holds its own
//! [`TokenValidator`] over the same signing secret.
//!
//! Credentials are in memory and lost on restart. Passwords are stored as
//! Argon2id hashes only (see [`password`]).

pub mod error;
pub mod password;
pub mod routes;
pub mod store;

use axum::routing::get;
use axum::Router;
use bnk_token::{TokenConfig, TokenIssuer, TokenValidator};
use tower_http::trace::TraceLayer;

use crate::password::PasswordHasher;
use crate::store::CredentialStore;

/// Shared application state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub credentials: CredentialStore,
    pub hasher: PasswordHasher,
    pub issuer: TokenIssuer,
    pub validator: TokenValidator,
}

impl AppState {
    /// Empty credential store, default Argon2id cost, tokens per `config`.
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            credentials: CredentialStore::new(),
            hasher: PasswordHasher::default(),
            issuer: config.issuer(),
            validator: config.validator(),
        }
    }
}

/// Assemble the auth service router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe. 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. The secret is loaded before the router exists.
async fn readiness() -> &'static str {
    "ready"
}
