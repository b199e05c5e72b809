//! # Bank API
//!
//! Plain CRUD on the local bank store, except delete, which goes through
//! the coordinator so the bank's accounts are removed first.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use bnk_core::{Bank, BankDraft, BankId};

use crate::error::AppError;
use crate::extractors::{extract_path, extract_validated_json};
use crate::state::AppState;

/// Build the bank router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bank", get(list_banks).post(create_bank))
        .route(
            "/bank/:bank_id",
            get(get_bank).put(update_bank).delete(delete_bank),
        )
}

fn bank_not_found(id: BankId) -> AppError {
    AppError::NotFound(format!("Bank not found: {id}"))
}

/// GET /bank: List all banks.
#[utoipa::path(
    get,
    path = "/bank",
    responses((status = 200, description = "All banks", body = Vec<Bank>)),
    tag = "banks"
)]
pub async fn list_banks(State(state): State<AppState>) -> Json<Vec<Bank>> {
    Json(state.banks.list())
}

/// POST /bank: Create a bank.
#[utoipa::path(
    post,
    path = "/bank",
    request_body = BankDraft,
    responses(
        (status = 201, description = "Bank created", body = Bank),
        (status = 400, description = "Invalid bank", body = bnk_core::ErrorBody),
    ),
    tag = "banks"
)]
pub async fn create_bank(
    State(state): State<AppState>,
    body: Result<Json<BankDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Bank>), AppError> {
    let draft = extract_validated_json(body)?;
    let bank = state.banks.create(draft).await?;
    tracing::info!(bank_id = %bank.id, "bank created");
    Ok((StatusCode::CREATED, Json(bank)))
}

/// GET /bank/{bank_id}: Get one bank.
#[utoipa::path(
    get,
    path = "/bank/{bank_id}",
    params(("bank_id" = i64, Path, description = "Bank id")),
    responses(
        (status = 200, description = "Bank found", body = Bank),
        (status = 404, description = "Bank not found", body = bnk_core::ErrorBody),
    ),
    tag = "banks"
)]
pub async fn get_bank(
    State(state): State<AppState>,
    path: Result<Path<BankId>, PathRejection>,
) -> Result<Json<Bank>, AppError> {
    let bank_id = extract_path(path)?;
    state
        .banks
        .get(bank_id)
        .map(Json)
        .ok_or_else(|| bank_not_found(bank_id))
}

/// PUT /bank/{bank_id}: Replace a bank's name, location and branch code.
#[utoipa::path(
    put,
    path = "/bank/{bank_id}",
    params(("bank_id" = i64, Path, description = "Bank id")),
    request_body = BankDraft,
    responses(
        (status = 200, description = "Bank updated", body = Bank),
        (status = 400, description = "Invalid bank", body = bnk_core::ErrorBody),
        (status = 404, description = "Bank not found", body = bnk_core::ErrorBody),
    ),
    tag = "banks"
)]
pub async fn update_bank(
    State(state): State<AppState>,
    path: Result<Path<BankId>, PathRejection>,
    body: Result<Json<BankDraft>, JsonRejection>,
) -> Result<Json<Bank>, AppError> {
    let bank_id = extract_path(path)?;
    let draft = extract_validated_json(body)?;
    let bank = state
        .banks
        .update(bank_id, draft)
        .await?
        .ok_or_else(|| bank_not_found(bank_id))?;
    tracing::info!(bank_id = %bank_id, "bank updated");
    Ok(Json(bank))
}

/// DELETE /bank/{bank_id}: Delete a bank's accounts, then the bank.
#[utoipa::path(
    delete,
    path = "/bank/{bank_id}",
    params(("bank_id" = i64, Path, description = "Bank id")),
    responses(
        (status = 200, description = "Bank and its accounts deleted", body = String),
        (status = 404, description = "Bank not found", body = bnk_core::ErrorBody),
        (status = 502, description = "Account cleanup failed; bank kept", body = bnk_core::ErrorBody),
    ),
    tag = "banks"
)]
pub async fn delete_bank(
    State(state): State<AppState>,
    path: Result<Path<BankId>, PathRejection>,
) -> Result<&'static str, AppError> {
    let bank_id = extract_path(path)?;
    state.coordinator.delete_bank(bank_id).await?;
    Ok("Bank and its accounts are deleted successfully")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use bnk_account_client::{AccountStoreClient, AccountStoreConfig};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::coordinator::Coordinator;
    use crate::state::BankStore;

    // Bank CRUD never reaches the account service; port 1 refuses anyway.
    fn test_state() -> AppState {
        let banks = BankStore::new();
        let client =
            AccountStoreClient::new(AccountStoreConfig::new("http://127.0.0.1:1").unwrap()).unwrap();
        let coordinator = Coordinator::new(banks.clone(), Arc::new(client), Duration::from_secs(1));
        AppState::new(banks, coordinator)
    }

    fn test_app(state: AppState) -> Router {
        router().with_state(state)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn create_then_get() {
        let state = test_state();
        let (status, body) = send(
            test_app(state.clone()),
            "POST",
            "/bank",
            Some(r#"{"name":"Test Bank","location":"Springfield","branchCode":"SP-01"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: Bank = serde_json::from_str(&body).unwrap();
        assert_eq!(created.id, BankId::new(1));
        assert_eq!(created.name, "Test Bank");

        let (status, body) = send(test_app(state), "GET", "/bank/1", None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: Bank = serde_json::from_str(&body).unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let state = test_state();
        for name in ["A", "B", "C"] {
            let json = format!(r#"{{"name":"{name}"}}"#);
            let (status, _) = send(test_app(state.clone()), "POST", "/bank", Some(&json)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let (status, body) = send(test_app(state), "GET", "/bank", None).await;
        assert_eq!(status, StatusCode::OK);
        let banks: Vec<Bank> = serde_json::from_str(&body).unwrap();
        let names: Vec<&str> = banks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn missing_bank_is_404() {
        let (status, body) = send(test_app(test_state()), "GET", "/bank/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["message"], "Bank not found: 999");
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (status, body) =
            send(test_app(test_state()), "POST", "/bank", Some(r#"{"name":"  "}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = send(test_app(test_state()), "POST", "/bank", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let state = test_state();
        send(test_app(state.clone()), "POST", "/bank", Some(r#"{"name":"Old","location":"X"}"#)).await;
        let (status, body) = send(
            test_app(state.clone()),
            "PUT",
            "/bank/1",
            Some(r#"{"name":"New","location":"Y","branchCode":"B2"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let bank: Bank = serde_json::from_str(&body).unwrap();
        assert_eq!(bank.name, "New");
        assert_eq!(bank.location, "Y");
        assert_eq!(bank.branch_code, "B2");
        assert_eq!(state.banks.get(BankId::new(1)), Some(bank));
    }

    #[tokio::test]
    async fn update_missing_bank_is_404() {
        let (status, _) =
            send(test_app(test_state()), "PUT", "/bank/5", Some(r#"{"name":"Nope"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_keeps_bank_when_account_service_is_down() {
        let state = test_state();
        send(test_app(state.clone()), "POST", "/bank", Some(r#"{"name":"Kept"}"#)).await;
        let (status, body) = send(test_app(state.clone()), "DELETE", "/bank/1", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], "DEPENDENCY_DELETION_FAILED");
        assert!(state.banks.contains(BankId::new(1)));
    }

    #[tokio::test]
    async fn delete_missing_bank_is_404() {
        let (status, _) = send(test_app(test_state()), "DELETE", "/bank/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_bank_id_is_structured_400() {
        let state = test_state();
        for method in ["GET", "DELETE"] {
            let (status, body) = send(test_app(state.clone()), method, "/bank/abc", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            let json: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(json["statusCode"], 400);
            assert_eq!(json["code"], "BAD_REQUEST");
            assert!(json["timestamp"].is_i64());
        }
    }
}
