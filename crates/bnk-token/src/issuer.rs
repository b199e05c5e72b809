//! # Token Issuance
//!
//! Signs `{sub, iat, exp}` claims with HS256. The issuer does not look at
//! credentials; the caller authenticates the user first.

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::claims::Claims;
use crate::error::TokenError;
use crate::secret::SigningSecret;

/// Default validity window: 30 minutes.
pub const DEFAULT_TTL_SECS: u64 = 30 * 60;

/// Signs bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl_secs: i64,
}

impl TokenIssuer {
    /// Build an issuer over `secret` with a validity window of `ttl_secs`.
    pub fn new(secret: &SigningSecret, ttl_secs: u64) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Issue a token for `username`, valid from now for the configured window.
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        self.issue_at(username, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, username: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: username.to_string(),
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        tracing::debug!(subject = %username, exp = claims.exp, "issued bearer token");
        Ok(token)
    }

    /// The configured validity window.
    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_secs.unsigned_abs())
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("key", &"[REDACTED]")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}
