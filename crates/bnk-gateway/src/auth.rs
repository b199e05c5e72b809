//! # Bearer Token Filter
//!
//! Sits in front of the bank and account routes. Two distinct rejections:
//!
//! | Request | Response |
//! |---------|----------|
//! | no `Authorization: Bearer <token>` | 400 `MISSING_CREDENTIAL` |
//! | token fails signature or expiry check | 401 `UNAUTHORIZED_ACCESS` |
//!
//! A missing credential is decided before the validator is consulted.
//! Accepted requests continue unchanged: no headers are added or removed.

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bnk_token::TokenValidator;

use crate::error::GatewayError;
use crate::metrics::ApiMetrics;

/// Filter configuration injected into request extensions.
#[derive(Clone, Debug)]
pub struct AuthFilter {
    pub validator: TokenValidator,
}

/// The bearer token on `request`, if there is a non-empty one.
///
/// Other schemes (`Basic ...`) count as no bearer credential.
pub fn bearer_token(request: &Request) -> Option<&str> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware enforcing a valid bearer token.
pub async fn auth_filter(request: Request, next: Next) -> Response {
    let Some(filter) = request.extensions().get::<AuthFilter>().cloned() else {
        tracing::error!("auth filter mounted without configuration");
        return GatewayError::UnauthorizedAccess.into_response();
    };
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let reject = |err: GatewayError| {
        if let Some(m) = &metrics {
            m.record_auth_rejection();
        }
        err.into_response()
    };

    let outcome = match bearer_token(&request) {
        None => Err(GatewayError::MissingCredential),
        Some(token) => filter.validator.validate(token).map_err(|e| {
            tracing::warn!(reason = %e, path = %request.uri().path(), "bearer token rejected");
            GatewayError::UnauthorizedAccess
        }),
    };

    match outcome {
        Ok(claims) => {
            tracing::debug!(subject = %claims.sub, "bearer token accepted");
            next.run(request).await
        }
        Err(err) => {
            if matches!(err, GatewayError::MissingCredential) {
                tracing::warn!(path = %request.uri().path(), "missing bearer credential");
            }
            reject(err)
        }
    }
}
