//! # Error Response Body
//!
//! The one JSON shape every service uses for rejected requests. It carries
//! the numeric status, a machine-readable code, a human-readable message
//! and the epoch-millisecond time the error was produced. Internal error
//! details never go in here.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Structured error payload: `{statusCode, code, message, timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// HTTP status code, repeated in the body for clients that lose headers.
    pub status_code: u16,
    /// Machine-readable error code (e.g. `NOT_FOUND`, `MISSING_CREDENTIAL`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ErrorBody {
    /// Build an error body stamped with the current time.
    pub fn new(status_code: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status_code,
            code: code.into(),
            message: message.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
