//! # Bank-Scoped Account API
//!
//! Accounts under a bank, reached through the coordinator. The bank must
//! exist here; the accounts themselves live in the account service.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use bnk_core::{Account, AccountId, AccountPayload, BankId};

use crate::error::AppError;
use crate::extractors::{extract_path, extract_validated_json};
use crate::state::AppState;

/// Build the bank-scoped account router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/bank/:bank_id/accounts",
            get(list_accounts).post(create_account),
        )
        .route(
            "/bank/:bank_id/accounts/:account_id",
            put(update_account).delete(delete_account),
        )
}

/// GET /bank/{bank_id}/accounts: Accounts of a bank.
#[utoipa::path(
    get,
    path = "/bank/{bank_id}/accounts",
    params(("bank_id" = i64, Path, description = "Bank id")),
    responses(
        (status = 200, description = "Accounts of the bank, possibly empty", body = Vec<Account>),
        (status = 404, description = "Bank not found", body = bnk_core::ErrorBody),
        (status = 503, description = "Account service unavailable", body = bnk_core::ErrorBody),
    ),
    tag = "accounts"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    path: Result<Path<BankId>, PathRejection>,
) -> Result<Json<Vec<Account>>, AppError> {
    let bank_id = extract_path(path)?;
    Ok(Json(state.coordinator.list_accounts(bank_id).await?))
}

/// POST /bank/{bank_id}/accounts: Create an account under a bank.
#[utoipa::path(
    post,
    path = "/bank/{bank_id}/accounts",
    params(("bank_id" = i64, Path, description = "Bank id")),
    request_body = AccountPayload,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 404, description = "Bank not found", body = bnk_core::ErrorBody),
        (status = 503, description = "Account service unavailable", body = bnk_core::ErrorBody),
    ),
    tag = "accounts"
)]
pub async fn create_account(
    State(state): State<AppState>,
    path: Result<Path<BankId>, PathRejection>,
    body: Result<Json<AccountPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let bank_id = extract_path(path)?;
    let payload = extract_validated_json(body)?;
    let account = state.coordinator.create_account(bank_id, payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// PUT /bank/{bank_id}/accounts/{account_id}: Replace an account under a bank.
#[utoipa::path(
    put,
    path = "/bank/{bank_id}/accounts/{account_id}",
    params(
        ("bank_id" = i64, Path, description = "Bank id"),
        ("account_id" = i64, Path, description = "Account id"),
    ),
    request_body = AccountPayload,
    responses(
        (status = 200, description = "Account updated", body = Account),
        (status = 404, description = "Bank or account not found", body = bnk_core::ErrorBody),
        (status = 503, description = "Account service unavailable", body = bnk_core::ErrorBody),
    ),
    tag = "accounts"
)]
pub async fn update_account(
    State(state): State<AppState>,
    path: Result<Path<(BankId, AccountId)>, PathRejection>,
    body: Result<Json<AccountPayload>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let (bank_id, account_id) = extract_path(path)?;
    let payload = extract_validated_json(body)?;
    let account = state
        .coordinator
        .update_account(bank_id, account_id, payload)
        .await?;
    Ok(Json(account))
}

/// DELETE /bank/{bank_id}/accounts/{account_id}: Delete an account under a bank.
#[utoipa::path(
    delete,
    path = "/bank/{bank_id}/accounts/{account_id}",
    params(
        ("bank_id" = i64, Path, description = "Bank id"),
        ("account_id" = i64, Path, description = "Account id"),
    ),
    responses(
        (status = 200, description = "Account deleted", body = String),
        (status = 404, description = "Bank or account not found", body = bnk_core::ErrorBody),
    ),
    tag = "accounts"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    path: Result<Path<(BankId, AccountId)>, PathRejection>,
) -> Result<String, AppError> {
    let (bank_id, account_id) = extract_path(path)?;
    state
        .coordinator
        .delete_account(bank_id, account_id)
        .await?;
    Ok(format!("Account deleted successfully for bank_id: {bank_id}"))
}
