//! # bnk-account-service — Account Store
//!
//! Owns account records. Each account carries a weak bank reference
//! (`bankId`) that this service stores but never verifies; it has no view
//! of banks at all.
//!
//! ## Two Ways In
//!
//! - **Unscoped**: `POST /accounts` accepts any bank reference, including
//!   one for a bank that does not exist. This entry point is kept as is.
//! - **Bank-scoped**: the bank service's coordinator checks the bank first
//!   and then calls this service. That is the checked path.
//!
//! Lookup by owning bank and bulk delete by owning bank exist for the
//! coordinator's list and cascade-delete operations.
//!
//! Storage is in-memory (DashMap); data is lost on restart.

pub mod error;
pub mod routes;
pub mod store;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use store::AccountStore;

/// Assemble the account service router.
pub fn app(store: AccountStore) -> Router {
    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Liveness probe. 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. The in-memory store is ready as soon as it exists.
async fn readiness() -> &'static str {
    "ready"
}
