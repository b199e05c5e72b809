//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers to
//! extract + validate JSON bodies and path parameters in handlers.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;
use bnk_core::{AccountPayload, BankDraft, ValidationError};

use crate::error::AppError;

/// Request types with business rules beyond what serde checks.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for BankDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        BankDraft::validate(self)
    }
}

// Bank-scoped payloads get their bank from the path; nothing else to check.
impl Validate for AccountPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract path parameters, mapping parse errors to [`AppError::BadRequest`].
pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    result
        .map(|Path(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate()?;
    Ok(value)
}
