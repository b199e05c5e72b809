//! # Route Modules
//!
//! | Prefix | Module | Domain |
//! |--------|--------|--------|
//! | `/bank`, `/bank/:bank_id` | [`banks`] | Bank CRUD, cascade delete |
//! | `/bank/:bank_id/accounts/*` | [`accounts`] | Bank-scoped accounts via the coordinator |

pub mod accounts;
pub mod banks;

use axum::Router;

use crate::state::AppState;

/// All bank service API routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(banks::router())
        .merge(accounts::router())
}
