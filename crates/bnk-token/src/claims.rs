//! Token claims.

use serde::{Deserialize, Serialize};

/// Claims carried by every bearer token.
///
/// Times are Unix seconds, as in the JWT registered claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username the token was issued to.
    pub sub: String,
    /// Issued-at.
    pub iat: i64,
    /// Expiry. The token is invalid at and after this instant.
    pub exp: i64,
}

impl Claims {
    /// Whether the token has expired at `now` (Unix seconds).
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}
