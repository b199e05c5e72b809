//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented bank routes into one document, served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the bank service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bank Service",
        version = "0.1.0",
        description = "Banks and the accounts registered under them.",
        license(name = "BUSL-1.1")
    ),
    paths(
        // Banks
        crate::routes::banks::list_banks,
        crate::routes::banks::create_bank,
        crate::routes::banks::get_bank,
        crate::routes::banks::update_bank,
        crate::routes::banks::delete_bank,
        // Bank-scoped accounts
        crate::routes::accounts::list_accounts,
        crate::routes::accounts::create_account,
        crate::routes::accounts::update_account,
        crate::routes::accounts::delete_account,
    ),
    components(schemas(
        bnk_core::Bank,
        bnk_core::BankDraft,
        bnk_core::Account,
        bnk_core::AccountPayload,
        bnk_core::BankId,
        bnk_core::AccountId,
        bnk_core::ErrorBody,
    )),
    tags(
        (name = "banks", description = "Bank records"),
        (name = "accounts", description = "Accounts of a bank, kept in the account service"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
