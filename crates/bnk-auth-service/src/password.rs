//! # Password Hashing
//!
//! Argon2id with a fresh random salt per credential, stored as a PHC
//! string (`$argon2id$v=19$...`). Hashing is deliberately slow, so the
//! async entry points move the work onto the blocking pool.
//!
//! A login for an unknown user still runs one verification, against a
//! decoy hash made with the same parameters, so both refusals cost the same.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use std::sync::{Arc, OnceLock};

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

/// Password hashing failure.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("password hashing task failed: {0}")]
    Task(String),
}

/// Argon2id hasher with fixed cost parameters.
#[derive(Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    decoy: Arc<OnceLock<String>>,
}

impl PasswordHasher {
    /// A hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            decoy: Arc::default(),
        }
    }

    /// Hash `password` under a new random salt.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Whether `password` matches the PHC string `stored`.
    ///
    /// An unparseable `stored` never matches. Parameters are read from the
    /// PHC string, so hashes made under other costs still verify.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, password: Zeroizing<String>) -> Result<String, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::Task(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking pool. A failed task counts
    /// as a mismatch.
    pub async fn verify_blocking(&self, password: Zeroizing<String>, stored: String) -> bool {
        let hasher = self.clone();
        match tokio::task::spawn_blocking(move || hasher.verify(&password, &stored)).await {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!(error = %e, "password verification task failed");
                false
            }
        }
    }

    /// Run one verification of `password` against the decoy hash and
    /// discard the outcome.
    pub async fn verify_decoy_blocking(&self, password: Zeroizing<String>) {
        let hasher = self.clone();
        let task = tokio::task::spawn_blocking(move || {
            let decoy = hasher.decoy();
            hasher.verify(&password, decoy);
        });
        if let Err(e) = task.await {
            tracing::error!(error = %e, "decoy verification task failed");
        }
    }

    fn decoy(&self) -> &str {
        self.decoy
            .get_or_init(|| self.hash("decoy-credential-0").unwrap_or_default())
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(Params::new(Params::MIN_M_COST, 1, 1, None).unwrap())
}

#[cfg(test)]
impl PasswordHasher {
    pub(crate) fn decoy_computed(&self) -> bool {
        self.decoy.get().is_some()
    }
}
