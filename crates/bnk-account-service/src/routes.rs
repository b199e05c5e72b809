//! Route definitions for the account service.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET    | `/accounts` | [`list_accounts`] |
//! | POST   | `/accounts` | [`create_account`] |
//! | GET    | `/accounts/:id` | [`get_account`] |
//! | PUT    | `/accounts/:id` | [`update_account`] |
//! | DELETE | `/accounts/:id` | [`delete_account`] |
//! | GET    | `/accounts/bank/:bank_id` | [`list_by_bank`] |
//! | DELETE | `/accounts/bank/:bank_id` | [`delete_by_bank`] |

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use bnk_core::{Account, AccountId, AccountPayload, BankId};

use crate::error::AppError;
use crate::store::AccountStore;

/// Build the `/accounts` router.
pub fn router() -> Router<AccountStore> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route(
            "/accounts/bank/:bank_id",
            get(list_by_bank).delete(delete_by_bank),
        )
}

fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    result
        .map(|Path(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

fn account_not_found(id: AccountId) -> AppError {
    AppError::NotFound(format!("Account not found: {id}"))
}

/// GET /accounts
pub async fn list_accounts(State(store): State<AccountStore>) -> Json<Vec<Account>> {
    Json(store.list())
}

/// POST /accounts
///
/// Unscoped creation: the bank reference is required but not verified.
/// Callers that need the bank checked go through the bank service.
pub async fn create_account(
    State(store): State<AccountStore>,
    body: Result<Json<AccountPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let payload = extract_json(body)?;
    let account = store.create(payload)?;
    tracing::info!(account_id = %account.id, bank_id = %account.bank_id, "account created");
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /accounts/:id
pub async fn get_account(
    State(store): State<AccountStore>,
    path: Result<Path<AccountId>, PathRejection>,
) -> Result<Json<Account>, AppError> {
    let id = extract_path(path)?;
    store.get(id).map(Json).ok_or_else(|| account_not_found(id))
}

/// PUT /accounts/:id
pub async fn update_account(
    State(store): State<AccountStore>,
    path: Result<Path<AccountId>, PathRejection>,
    body: Result<Json<AccountPayload>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let id = extract_path(path)?;
    let payload = extract_json(body)?;
    let account = store
        .update(id, payload)
        .ok_or_else(|| account_not_found(id))?;
    tracing::info!(account_id = %id, "account updated");
    Ok(Json(account))
}

/// DELETE /accounts/:id
pub async fn delete_account(
    State(store): State<AccountStore>,
    path: Result<Path<AccountId>, PathRejection>,
) -> Result<&'static str, AppError> {
    let id = extract_path(path)?;
    store.remove(id).ok_or_else(|| account_not_found(id))?;
    tracing::info!(account_id = %id, "account deleted");
    Ok("Account deleted successfully")
}

/// GET /accounts/bank/:bank_id
///
/// A bank with no accounts yields `200 []`.
pub async fn list_by_bank(
    State(store): State<AccountStore>,
    path: Result<Path<BankId>, PathRejection>,
) -> Result<Json<Vec<Account>>, AppError> {
    let bank_id = extract_path(path)?;
    Ok(Json(store.list_by_bank(bank_id)))
}

/// DELETE /accounts/bank/:bank_id
///
/// Succeeds whether or not any accounts referenced the bank.
pub async fn delete_by_bank(
    State(store): State<AccountStore>,
    path: Result<Path<BankId>, PathRejection>,
) -> Result<&'static str, AppError> {
    let bank_id = extract_path(path)?;
    let removed = store.remove_by_bank(bank_id);
    tracing::info!(bank_id = %bank_id, removed, "accounts deleted for bank");
    Ok("All accounts for the bank are deleted successfully")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app(store: AccountStore) -> Router {
        router().with_state(store)
    }

    async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
        resp.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(resp).await).unwrap()
    }

    fn post_json(uri: &str, json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn create_returns_201_with_assigned_id() {
        let app = test_app(AccountStore::new());
        let resp = app
            .oneshot(post_json(
                "/accounts",
                r#"{"accountNumber": 1001, "accountType": "savings", "balance": 50, "bankId": 3}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["bankId"], 3);
    }

    #[tokio::test]
    async fn create_without_bank_is_400() {
        let app = test_app(AccountStore::new());
        let resp = app
            .oneshot(post_json("/accounts", r#"{"accountNumber": 1}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn create_with_malformed_json_is_400() {
        let app = test_app(AccountStore::new());
        let resp = app.oneshot(post_json("/accounts", "{not json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn get_missing_account_is_404() {
        let app = test_app(AccountStore::new());
        let resp = app.oneshot(request("GET", "/accounts/9")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["message"], "Account not found: 9");
    }

    #[tokio::test]
    async fn list_by_bank_empty_is_200() {
        let app = test_app(AccountStore::new());
        let resp = app
            .oneshot(request("GET", "/accounts/bank/1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn delete_by_bank_removes_only_that_bank() {
        let store = AccountStore::new();
        for bank in [1, 1, 2] {
            store
                .create(AccountPayload::default().stamped(BankId::new(bank)))
                .unwrap();
        }
        let resp = test_app(store.clone())
            .oneshot(request("DELETE", "/accounts/bank/1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_bytes(resp).await,
            b"All accounts for the bank are deleted successfully"
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.list_by_bank(BankId::new(2)).len(), 1);
    }

    #[tokio::test]
    async fn delete_account_then_404() {
        let store = AccountStore::new();
        let account = store
            .create(AccountPayload::default().stamped(BankId::new(1)))
            .unwrap();
        let uri = format!("/accounts/{}", account.id);

        let resp = test_app(store.clone())
            .oneshot(request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, b"Account deleted successfully");

        let resp = test_app(store).oneshot(request("DELETE", &uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let store = AccountStore::new();
        let account = store
            .create(AccountPayload::default().stamped(BankId::new(4)))
            .unwrap();
        let req = Request::builder()
            .method("PUT")
            .uri(format!("/accounts/{}", account.id))
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"accountNumber": 77, "accountType": "checking", "balance": -5, "bankId": 4}"#,
            ))
            .unwrap();
        let resp = test_app(store).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["accountType"], "checking");
        assert_eq!(body["balance"], -5);
    }

    #[tokio::test]
    async fn non_numeric_ids_are_structured_400() {
        for (method, uri) in [("GET", "/accounts/abc"), ("DELETE", "/accounts/bank/abc")] {
            let resp = test_app(AccountStore::new())
                .oneshot(request(method, uri))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body = body_json(resp).await;
            assert_eq!(body["statusCode"], 400);
            assert_eq!(body["code"], "BAD_REQUEST");
        }
    }
}
