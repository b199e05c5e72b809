//! # Auth API
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | `/auth/register` | [`register`] |
//! | POST | `/auth/token` | [`token`] |
//! | GET  | `/auth/validate?token=` | [`validate`] |

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use bnk_core::NewCredential;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::error::AppError;
use crate::AppState;

/// Returned for both unknown users and wrong passwords.
pub const INVALID_CREDENTIALS: &str =
    "Invalid Access! User Doesn't exist or credentials are incorrect.";

/// Body of `POST /auth/token`.
#[derive(Default, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl std::fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRequest")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Query of `GET /auth/validate`.
#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    pub token: Option<String>,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/token", post(token))
        .route("/auth/validate", get(validate))
}

fn json_body<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

// Absent and blank are the same thing to the caller.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /auth/register: Add a credential.
async fn register(
    State(state): State<AppState>,
    body: Result<Json<NewCredential>, JsonRejection>,
) -> Result<&'static str, AppError> {
    let credential = json_body(body)?;
    credential
        .validate()
        .map_err(|errors| AppError::from_validation(&errors))?;

    // Cheap early rejection; the insert below is what enforces uniqueness.
    if state.credentials.contains(&credential.name) {
        return Err(AppError::Conflict(format!(
            "User already exists: {}",
            credential.name
        )));
    }

    let NewCredential {
        name,
        email,
        password,
    } = credential;
    let hash = state.hasher.hash_blocking(Zeroizing::new(password)).await?;
    let stored = state.credentials.insert(name, email, hash)?;
    tracing::info!(user_id = stored.id, name = %stored.name, "user registered");
    Ok("User added to the System")
}

/// POST /auth/token: Exchange a username and password for a bearer token.
async fn token(
    State(state): State<AppState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<String, AppError> {
    let request = json_body(body)?;
    let username = present(request.username)
        .ok_or_else(|| AppError::Unauthorized("Authentication failed: username is required".into()))?;
    let password = present(request.password)
        .map(Zeroizing::new)
        .ok_or_else(|| AppError::Unauthorized("Authentication failed: password is required".into()))?;

    let Some(stored) = state.credentials.find(&username) else {
        state.hasher.verify_decoy_blocking(password).await;
        tracing::info!(name = %username, "token refused: unknown user");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };
    if !state
        .hasher
        .verify_blocking(password, stored.password_hash)
        .await
    {
        tracing::info!(name = %username, "token refused: wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    Ok(state.issuer.issue(&username)?)
}

/// GET /auth/validate: Check a token without using it.
async fn validate(
    State(state): State<AppState>,
    params: Result<Query<ValidateParams>, QueryRejection>,
) -> Result<&'static str, AppError> {
    let Query(params) = params.map_err(|err| AppError::BadRequest(err.body_text()))?;
    let token = present(params.token)
        .ok_or_else(|| AppError::BadRequest("token query parameter is required".into()))?;
    state.validator.validate(&token)?;
    Ok("Token is Valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use base64::Engine as _;
    use bnk_token::{SigningSecret, TokenIssuer, TokenValidator};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::password::fast_hasher;
    use crate::store::CredentialStore;

    fn secret() -> SigningSecret {
        let encoded = base64::engine::general_purpose::STANDARD.encode([42u8; 32]);
        SigningSecret::from_base64(&encoded).unwrap()
    }

    fn test_state() -> AppState {
        let secret = secret();
        AppState {
            credentials: CredentialStore::new(),
            hasher: fast_hasher(),
            issuer: TokenIssuer::new(&secret, 1800),
            validator: TokenValidator::new(&secret),
        }
    }

    async fn send(state: &AppState, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        let resp = router().with_state(state.clone()).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn message(body: &str) -> String {
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        json["message"].as_str().unwrap().to_string()
    }

    const ALICE: &str = r#"{"name":"alice","email":"alice@example.com","password":"wonder1and"}"#;

    #[tokio::test]
    async fn register_stores_hash_only() {
        let state = test_state();
        let (status, body) = send(&state, "POST", "/auth/register", Some(ALICE)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "User added to the System");
        let stored = state.credentials.find("alice").unwrap();
        assert!(stored.password_hash.starts_with("$argon2id$"));
        assert!(!stored.password_hash.contains("wonder1and"));
    }

    #[tokio::test]
    async fn register_aggregates_field_errors() {
        let state = test_state();
        let (status, body) = send(
            &state,
            "POST",
            "/auth/register",
            Some(r#"{"name":"","email":"  ","password":"short"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let msg = message(&body);
        assert!(msg.contains("name"), "{msg}");
        assert!(msg.contains("email"), "{msg}");
        assert!(msg.contains("password must be at least 8 characters"), "{msg}");
        assert!(state.credentials.is_empty());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_name() {
        let state = test_state();
        send(&state, "POST", "/auth/register", Some(ALICE)).await;
        let (status, body) = send(&state, "POST", "/auth/register", Some(ALICE)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message(&body), "User already exists: alice");
    }

    #[tokio::test]
    async fn token_for_registered_user_validates() {
        let state = test_state();
        send(&state, "POST", "/auth/register", Some(ALICE)).await;
        let (status, token) = send(
            &state,
            "POST",
            "/auth/token",
            Some(r#"{"username":"alice","password":"wonder1and"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.validator.subject(&token).unwrap(), "alice");

        let (status, body) = send(&state, "GET", &format!("/auth/validate?token={token}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Token is Valid");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let state = test_state();
        send(&state, "POST", "/auth/register", Some(ALICE)).await;
        let (s1, b1) = send(
            &state,
            "POST",
            "/auth/token",
            Some(r#"{"username":"alice","password":"wrongpass9"}"#),
        )
        .await;
        let (s2, b2) = send(
            &state,
            "POST",
            "/auth/token",
            Some(r#"{"username":"mallory","password":"wonder1and"}"#),
        )
        .await;
        assert_eq!(s1, StatusCode::UNAUTHORIZED);
        assert_eq!(s2, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&b1), INVALID_CREDENTIALS);
        assert_eq!(message(&b2), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn unknown_user_still_pays_for_a_verification() {
        let state = test_state();
        let (status, _) = send(
            &state,
            "POST",
            "/auth/token",
            Some(r#"{"username":"nobody","password":"wonder1and"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(state.hasher.decoy_computed());
    }

    #[tokio::test]
    async fn missing_fields_are_named() {
        let state = test_state();
        let (status, body) =
            send(&state, "POST", "/auth/token", Some(r#"{"password":"wonder1and"}"#)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(message(&body).contains("username"));

        let (status, body) = send(&state, "POST", "/auth/token", Some(r#"{"username":"alice"}"#)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(message(&body).contains("password"));
    }

    #[tokio::test]
    async fn validate_rejects_garbage_and_expired() {
        let state = test_state();
        let (status, body) = send(&state, "GET", "/auth/validate?token=abc.def.ghi", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Invalid token");

        let stale = state
            .issuer
            .issue_at("alice", Utc::now() - chrono::Duration::hours(2))
            .unwrap();
        let (status, body) = send(&state, "GET", &format!("/auth/validate?token={stale}"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Token has expired");
    }

    #[tokio::test]
    async fn validate_requires_token_param() {
        let (status, _) = send(&test_state(), "GET", "/auth/validate", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn token_request_debug_hides_password() {
        let req = TokenRequest {
            username: Some("alice".into()),
            password: Some("wonder1and".into()),
        };
        assert!(!format!("{req:?}").contains("wonder1and"));
    }
}
