//! # Validation Errors
//!
//! Field-level validation failures for request payloads. These carry the
//! offending field name so handlers can build precise client messages
//! without guesswork.

use thiserror::Error;

/// A single payload field failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent from the payload.
    #[error("{field} is required")]
    Missing {
        /// Name of the missing field, as it appears on the wire.
        field: &'static str,
    },

    /// A string field was present but empty or whitespace.
    #[error("{field} must not be blank")]
    Blank {
        /// Name of the blank field.
        field: &'static str,
    },

    /// A field was present but its value breaks a format rule.
    #[error("{field} is invalid: {reason}")]
    Invalid {
        /// Name of the invalid field.
        field: &'static str,
        /// Human-readable rule that was broken.
        reason: String,
    },
}

impl ValidationError {
    /// Name of the field this error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::Blank { field } | Self::Invalid { field, .. } => field,
        }
    }
}

/// Reject a blank string field.
pub fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Blank { field })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        assert_eq!(
            ValidationError::Missing { field: "bankId" }.to_string(),
            "bankId is required"
        );
        assert_eq!(
            ValidationError::Blank { field: "name" }.to_string(),
            "name must not be blank"
        );
        let invalid = ValidationError::Invalid {
            field: "password",
            reason: "too short".into(),
        };
        assert_eq!(invalid.field(), "password");
        assert!(invalid.to_string().contains("too short"));
    }

    #[test]
    fn require_non_blank_rejects_whitespace() {
        assert!(require_non_blank("name", "   ").is_err());
        assert!(require_non_blank("name", "").is_err());
        assert!(require_non_blank("name", "Test Bank").is_ok());
    }
}
