//! # Signing Secret
//!
//! The HMAC key shared by the issuer and every validator. It is configured
//! as base64 text, decoded once, and kept in a zeroizing buffer. Clones
//! share the same allocation.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use zeroize::Zeroizing;

/// Minimum decoded key length for HS256.
pub const MIN_SECRET_LEN: usize = 32;

/// Errors building a [`SigningSecret`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    /// The configured value is not valid base64.
    #[error("signing secret is not valid base64: {0}")]
    NotBase64(String),

    /// The decoded key is too short for HS256.
    #[error("signing secret is {len} bytes, need at least {min}")]
    TooShort {
        /// Decoded length.
        len: usize,
        /// Required minimum.
        min: usize,
    },
}

/// Process-wide, read-only HMAC signing key.
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Arc<Zeroizing<Vec<u8>>>,
}

impl SigningSecret {
    /// Decode a base64-encoded secret.
    pub fn from_base64(encoded: &str) -> Result<Self, SecretError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| SecretError::NotBase64(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SecretError> {
        let bytes = Zeroizing::new(bytes);
        if bytes.len() < MIN_SECRET_LEN {
            return Err(SecretError::TooShort {
                len: bytes.len(),
                min: MIN_SECRET_LEN,
            });
        }
        Ok(Self {
            bytes: Arc::new(bytes),
        })
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSecret")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
