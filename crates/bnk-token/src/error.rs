//! Token protocol errors.

use thiserror::Error;

/// Why a token could not be issued or accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Structure, encoding, algorithm or signature did not verify.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Signature verified, but the expiry has passed.
    #[error("token expired at {expired_at}")]
    Expired {
        /// The token's `exp` claim (Unix seconds).
        expired_at: i64,
    },

    /// The issuer could not sign the claims.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// True for the two validation outcomes (as opposed to issuance failures).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Malformed(_) | Self::Expired { .. })
    }
}
