//! # API Error Types
//!
//! Maps auth outcomes to HTTP status codes and renders the shared
//! [`ErrorBody`]. Token and credential failures say what was wrong with the
//! request, never which part of a stored credential failed to match.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bnk_core::{ErrorBody, ValidationError};
use bnk_token::TokenError;
use thiserror::Error;

use crate::password::PasswordError;
use crate::store::DuplicateName;

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Registration fields failed validation (400).
    #[error("{0}")]
    Validation(String),

    /// Request body or query could not be parsed (400).
    #[error("{0}")]
    BadRequest(String),

    /// Missing, wrong or expired credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// The login name is taken (409).
    #[error("{0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Aggregate every field failure into one message.
    pub fn from_validation(errors: &[ValidationError]) -> Self {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(format!("Validation failed: {joined}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }

        (status, Json(ErrorBody::new(status.as_u16(), code, message))).into_response()
    }
}

impl From<DuplicateName> for AppError {
    fn from(err: DuplicateName) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed(_) => Self::Unauthorized("Invalid token".into()),
            TokenError::Expired { .. } => Self::Unauthorized("Token has expired".into()),
            TokenError::Signing(reason) => Self::Internal(reason),
        }
    }
}
