//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps coordinator and store outcomes to HTTP status codes and renders
//! the shared [`ErrorBody`]. Internal and upstream details are logged,
//! never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bnk_core::{ErrorBody, ValidationError};
use thiserror::Error;

use crate::coordinator::CoordinatorError;
use crate::state::BankStoreError;

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Request validation failed (400).
    #[error("{0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("{0}")]
    BadRequest(String),

    /// The account service is unreachable or timed out (503).
    #[error("account service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The account service answered with an error (502).
    #[error("upstream account service error: {0}")]
    UpstreamError(String),

    /// The bank's accounts could not be deleted, so the bank was kept (502).
    #[error("{message}")]
    DependencyDeletionFailed { message: String, reason: String },

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::UpstreamError(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::DependencyDeletionFailed { .. } => {
                (StatusCode::BAD_GATEWAY, "DEPENDENCY_DELETION_FAILED")
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal/upstream error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::UpstreamError(_) => "An upstream service error occurred".to_string(),
            Self::ServiceUnavailable(_) => "Account service is unavailable".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::UpstreamError(_) => tracing::error!(error = %self, "upstream API error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            Self::DependencyDeletionFailed { reason, .. } => {
                tracing::warn!(error = %self, reason = %reason, "bank kept after failed account cleanup")
            }
            _ => {}
        }

        (status, Json(ErrorBody::new(status.as_u16(), code, message))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<BankStoreError> for AppError {
    fn from(err: BankStoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<CoordinatorError> for AppError {
    fn from(err: CoordinatorError) -> Self {
        match err {
            CoordinatorError::BankNotFound(_) | CoordinatorError::AccountNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            CoordinatorError::UpstreamUnavailable(reason) => Self::ServiceUnavailable(reason),
            CoordinatorError::UpstreamFailed(reason) => Self::UpstreamError(reason),
            CoordinatorError::DependencyDeletionFailed { bank_id, reason } => {
                Self::DependencyDeletionFailed {
                    message: format!(
                        "Could not delete the accounts of bank {bank_id}; the bank was not deleted"
                    ),
                    reason,
                }
            }
            CoordinatorError::Internal(reason) => Self::Internal(reason),
        }
    }
}
