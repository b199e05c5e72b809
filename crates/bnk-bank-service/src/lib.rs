//! # bnk-bank-service — Banks and Bank-Scoped Accounts
//!
//! Owns bank records and is the checked entry point for accounts that
//! belong to a bank. Accounts themselves live in the account service and
//! are reached through the [`coordinator::Coordinator`].
//!
//! ## API Surface
//!
//! | Prefix | Module | Domain |
//! |--------|--------|--------|
//! | `/bank`, `/bank/:bank_id` | [`routes::banks`] | Bank CRUD, cascade delete |
//! | `/bank/:bank_id/accounts/*` | [`routes::accounts`] | Bank-scoped accounts |
//! | `/openapi.json` | [`openapi`] | Generated API description |
//! | `/health/*` | this module | Probes |
//!
//! ## Persistence
//!
//! Banks are held in memory. With `DATABASE_URL` set they are also written
//! through to Postgres and reloaded at startup (see [`db`]).

pub mod config;
pub mod coordinator;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use coordinator::{Coordinator, CoordinatorError};
pub use state::{AppState, BankStore};

/// Assemble the bank service router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(routes::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe. 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. The database (when configured) and the account
/// service must both answer.
async fn readiness(State(state): State<AppState>) -> Response {
    if let Some(pool) = state.banks.pool() {
        if let Err(e) = db::ping(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    if let Err(e) = state.coordinator.accounts().ping().await {
        tracing::warn!("Account service health check failed: {e}");
        return (StatusCode::SERVICE_UNAVAILABLE, "account service unreachable").into_response();
    }

    "ready".into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use bnk_account_client::{AccountDirectory, AccountStoreError};
    use bnk_core::{Account, AccountId, AccountPayload, BankId};
    use tower::ServiceExt;

    /// A directory with no accounts whose health depends on a flag.
    struct StaticDirectory {
        healthy: bool,
    }

    #[async_trait]
    impl AccountDirectory for StaticDirectory {
        async fn list_by_bank(&self, _: BankId) -> Result<Vec<Account>, AccountStoreError> {
            Ok(Vec::new())
        }
        async fn create(&self, payload: &AccountPayload) -> Result<Account, AccountStoreError> {
            Ok(payload.clone().into_account(AccountId::new(1)).unwrap())
        }
        async fn update(
            &self,
            id: AccountId,
            payload: &AccountPayload,
        ) -> Result<Account, AccountStoreError> {
            Ok(payload.clone().into_account(id).unwrap())
        }
        async fn delete(&self, _: AccountId) -> Result<(), AccountStoreError> {
            Ok(())
        }
        async fn delete_by_bank(&self, _: BankId) -> Result<(), AccountStoreError> {
            Ok(())
        }
        async fn ping(&self) -> Result<(), AccountStoreError> {
            if self.healthy {
                Ok(())
            } else {
                Err(AccountStoreError::Api {
                    endpoint: "GET /health/liveness".into(),
                    status: 503,
                    body: String::new(),
                })
            }
        }
    }

    fn test_app(healthy: bool) -> Router {
        let banks = BankStore::new();
        let coordinator = Coordinator::new(
            banks.clone(),
            Arc::new(StaticDirectory { healthy }),
            Duration::from_secs(1),
        );
        app(AppState::new(banks, coordinator))
    }

    async fn status_of(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn liveness_is_unconditional() {
        assert_eq!(status_of(test_app(false), "/health/liveness").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_account_service() {
        assert_eq!(status_of(test_app(true), "/health/readiness").await, StatusCode::OK);
        assert_eq!(
            status_of(test_app(false), "/health/readiness").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn openapi_is_served() {
        assert_eq!(status_of(test_app(true), "/openapi.json").await, StatusCode::OK);
    }
}
