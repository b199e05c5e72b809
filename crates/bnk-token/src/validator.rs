//! # Token Validation
//!
//! Verifies structure and signature first, then expiry against a caller
//! supplied clock. Decoding never consults the system clock, so
//! [`TokenValidator::validate_at`] depends only on its arguments.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::claims::Claims;
use crate::error::TokenError;
use crate::secret::SigningSecret;

/// Checks bearer tokens against the shared signing secret.
#[derive(Clone)]
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    /// Build a validator over `secret`.
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit `now` below.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate `token` against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate `token` as if the current time were `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;
        let claims = data.claims;
        if claims.is_expired_at(now.timestamp()) {
            return Err(TokenError::Expired {
                expired_at: claims.exp,
            });
        }
        Ok(claims)
    }

    /// Subject of a valid token.
    pub fn subject(&self, token: &str) -> Result<String, TokenError> {
        self.validate(token).map(|claims| claims.sub)
    }
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("key", &"[REDACTED]")
            .field("algorithm", &"HS256")
            .finish()
    }
}
