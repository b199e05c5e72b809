//! # Gateway Error Types
//!
//! Rejections produced by the gateway itself. Responses relayed from an
//! upstream service are passed through untouched and never pass through
//! here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bnk_core::ErrorBody;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// No bearer credential on a protected route (400).
    #[error("Missing authorization header")]
    MissingCredential,

    /// A bearer credential that failed validation (401).
    #[error("Unauthorized access to the application")]
    UnauthorizedAccess,

    /// The request could not be read (400).
    #[error("{0}")]
    BadRequest(String),

    /// The upstream could not be reached (502).
    #[error("upstream unreachable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream did not answer in time (504).
    #[error("upstream timed out: {0}")]
    UpstreamTimeout(String),
}

impl GatewayError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingCredential => (StatusCode::BAD_REQUEST, "MISSING_CREDENTIAL"),
            Self::UnauthorizedAccess => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED_ACCESS"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::UpstreamUnavailable(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
            Self::UpstreamTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::UpstreamUnavailable(_) => "Upstream service is unavailable".to_string(),
            Self::UpstreamTimeout(_) => "Upstream service did not respond in time".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::UpstreamUnavailable(_) | Self::UpstreamTimeout(_) => {
                tracing::warn!(error = %self, "forwarding failed")
            }
            _ => {}
        }

        (status, Json(ErrorBody::new(status.as_u16(), code, message))).into_response()
    }
}
