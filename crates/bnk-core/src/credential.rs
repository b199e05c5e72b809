//! # Credential Registration
//!
//! The registration payload accepted by the auth service. Only the password
//! hash is ever stored; the plaintext lives in this struct for the length of
//! one request.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{require_non_blank, ValidationError};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// A registration request.
#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct NewCredential {
    /// Login name. Unique across the credential store.
    #[serde(default)]
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCredential")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl NewCredential {
    /// Check every field and return all failures, not just the first.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if let Err(e) = require_non_blank("name", &self.name) {
            errors.push(e);
        }
        if let Err(e) = require_non_blank("email", &self.email) {
            errors.push(e);
        }
        if let Err(e) = require_non_blank("password", &self.password) {
            errors.push(e);
        } else if let Err(e) = check_password_strength(&self.password) {
            errors.push(e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_password_strength(password: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::Invalid {
        field: "password",
        reason: reason.to_string(),
    };
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid("must be at least 8 characters"));
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err(invalid("must contain a letter"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid("must contain a digit"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cred(name: &str, email: &str, password: &str) -> NewCredential {
        NewCredential {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn accepts_well_formed_registration() {
        assert!(cred("alice", "alice@example.com", "hunter22a").validate().is_ok());
    }

    #[test]
    fn aggregates_all_blank_fields() {
        let errors = cred("", " ", "").validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }

    #[test]
    fn enforces_password_rules() {
        for (pw, needle) in [
            ("a1", "at least 8"),
            ("12345678", "letter"),
            ("abcdefgh", "digit"),
        ] {
            let errors = cred("bob", "bob@example.com", pw).validate().unwrap_err();
            assert_eq!(errors.len(), 1);
            assert!(errors[0].to_string().contains(needle), "{pw}: {}", errors[0]);
        }
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", cred("carol", "c@example.com", "s3cretpass"));
        assert!(!rendered.contains("s3cretpass"));
    }
}
