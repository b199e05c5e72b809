//! # Credential Store
//!
//! In-memory credentials keyed by login name. Only password hashes are
//! stored. Name uniqueness is checked and enforced under one write lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// A stored credential.
#[derive(Clone)]
pub struct Credential {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// PHC-format Argon2id hash.
    pub password_hash: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// The name is already registered.
#[derive(Debug, thiserror::Error)]
#[error("User already exists: {0}")]
pub struct DuplicateName(pub String);

/// Shared credential store.
#[derive(Clone)]
pub struct CredentialStore {
    by_name: Arc<RwLock<HashMap<String, Credential>>>,
    next_id: Arc<AtomicI64>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            by_name: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Store a credential under a fresh id. Fails if `name` is taken.
    pub fn insert(
        &self,
        name: String,
        email: String,
        password_hash: String,
    ) -> Result<Credential, DuplicateName> {
        let mut map = self.by_name.write();
        if map.contains_key(&name) {
            return Err(DuplicateName(name));
        }
        let credential = Credential {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: name.clone(),
            email,
            password_hash,
        };
        map.insert(name, credential.clone());
        Ok(credential)
    }

    pub fn find(&self, name: &str) -> Option<Credential> {
        self.by_name.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.read().is_empty()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("credentials", &self.len())
            .finish()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}
