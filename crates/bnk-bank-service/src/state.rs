//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! - **Banks**: the local bank store, written through to Postgres when a
//!   pool is configured.
//! - **Coordinator**: bank-scoped account operations against the remote
//!   account service.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use bnk_core::{Bank, BankDraft, BankId};
use parking_lot::{Mutex, RwLock};
use sqlx::PgPool;

use crate::coordinator::Coordinator;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory ordered map.
///
/// The lock is `parking_lot` and never held across `.await` points.
#[derive(Debug)]
pub struct Store<K: Ord + Copy, V: Clone> {
    data: Arc<RwLock<BTreeMap<K, V>>>,
}

impl<K: Ord + Copy, V: Clone> Clone for Store<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Ord + Copy, V: Clone> Store<K, V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: K, value: V) -> Option<V> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &K) -> Option<V> {
        self.data.read().get(id).cloned()
    }

    /// List all records in key order.
    pub fn list(&self) -> Vec<V> {
        self.data.read().values().cloned().collect()
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &K, f: impl FnOnce(&mut V)) -> Option<V> {
        let mut guard = self.data.write();
        let entry = guard.get_mut(id)?;
        f(entry);
        Some(entry.clone())
    }

    /// Remove a record by ID.
    pub fn remove(&self, id: &K) -> Option<V> {
        self.data.write().remove(id)
    }

    /// Check if a record exists.
    pub fn contains(&self, id: &K) -> bool {
        self.data.read().contains_key(id)
    }

    /// Largest key present.
    pub fn max_key(&self) -> Option<K> {
        self.data.read().keys().next_back().copied()
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Ord + Copy, V: Clone> Default for Store<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Bank Store ---------------------------------------------------------------

/// Bank persistence failure.
#[derive(Debug, thiserror::Error)]
pub enum BankStoreError {
    #[error("bank persistence failed: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// The local bank store: in-memory map plus optional Postgres write-through.
///
/// Lookups are synchronous and never touch the database. Mutations update
/// memory and then the database; a failed database write is undone in
/// memory before the error is returned.
///
/// A bank can be marked as being deleted. A marked bank is still listed and
/// readable but is not [`live`](Self::is_live), so no account operation
/// starts against it.
#[derive(Clone)]
pub struct BankStore {
    banks: Store<BankId, Bank>,
    next_id: Arc<AtomicI64>,
    deleting: Arc<Mutex<HashSet<BankId>>>,
    pool: Option<PgPool>,
}

impl BankStore {
    /// An in-memory store with ids starting at 1.
    pub fn new() -> Self {
        Self::with_pool(None)
    }

    /// A store that writes through to `pool` when one is given.
    pub fn with_pool(pool: Option<PgPool>) -> Self {
        Self {
            banks: Store::new(),
            next_id: Arc::new(AtomicI64::new(1)),
            deleting: Arc::new(Mutex::new(HashSet::new())),
            pool,
        }
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    pub fn get(&self, id: BankId) -> Option<Bank> {
        self.banks.get(&id)
    }

    pub fn contains(&self, id: BankId) -> bool {
        self.banks.contains(&id)
    }

    /// Whether the bank exists and is not being deleted.
    pub fn is_live(&self, id: BankId) -> bool {
        self.banks.contains(&id) && !self.deleting.lock().contains(&id)
    }

    /// Mark a bank as being deleted. `false` if it does not exist or is
    /// already marked.
    pub fn begin_delete(&self, id: BankId) -> bool {
        let mut deleting = self.deleting.lock();
        self.banks.contains(&id) && deleting.insert(id)
    }

    /// Clear the mark set by [`begin_delete`](Self::begin_delete).
    pub fn end_delete(&self, id: BankId) {
        self.deleting.lock().remove(&id);
    }

    pub fn list(&self) -> Vec<Bank> {
        self.banks.list()
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Store a new bank under the next id.
    pub async fn create(&self, draft: BankDraft) -> Result<Bank, BankStoreError> {
        let id = BankId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let bank = draft.into_bank(id);
        self.banks.insert(id, bank.clone());

        if let Some(pool) = &self.pool {
            if let Err(e) = crate::db::banks::insert(pool, &bank).await {
                self.banks.remove(&id);
                tracing::error!(bank_id = %id, error = %e, "failed to persist bank");
                return Err(e.into());
            }
        }
        Ok(bank)
    }

    /// Replace a bank's fields. `Ok(None)` if the bank does not exist.
    pub async fn update(&self, id: BankId, draft: BankDraft) -> Result<Option<Bank>, BankStoreError> {
        let Some(previous) = self.banks.get(&id) else {
            return Ok(None);
        };
        let Some(bank) = self.banks.update(&id, |bank| bank.apply(draft)) else {
            return Ok(None);
        };
        if let Some(pool) = &self.pool {
            if let Err(e) = crate::db::banks::update(pool, &bank).await {
                self.banks.insert(id, previous);
                tracing::error!(bank_id = %id, error = %e, "failed to persist bank update");
                return Err(e.into());
            }
        }
        Ok(Some(bank))
    }

    /// Remove a bank. `Ok(None)` if it was already gone.
    pub async fn remove(&self, id: BankId) -> Result<Option<Bank>, BankStoreError> {
        let Some(bank) = self.banks.remove(&id) else {
            return Ok(None);
        };
        if let Some(pool) = &self.pool {
            if let Err(e) = crate::db::banks::delete(pool, id).await {
                self.banks.insert(id, bank);
                tracing::error!(bank_id = %id, error = %e, "failed to persist bank deletion");
                return Err(e.into());
            }
        }
        Ok(Some(bank))
    }

    /// Load every persisted bank into memory and move the id counter past them.
    pub async fn hydrate(&self) -> Result<usize, BankStoreError> {
        let Some(pool) = &self.pool else {
            return Ok(0);
        };
        let banks = crate::db::banks::load_all(pool).await?;
        let count = banks.len();
        for bank in banks {
            self.banks.insert(bank.id, bank);
        }
        self.advance_past_existing();
        tracing::info!(banks = count, "hydrated bank store from database");
        Ok(count)
    }

    /// Insert a bank under its own id, bypassing persistence.
    pub fn seed(&self, bank: Bank) {
        self.banks.insert(bank.id, bank);
        self.advance_past_existing();
    }

    fn advance_past_existing(&self) {
        if let Some(max) = self.banks.max_key() {
            self.next_id
                .fetch_max(max.get().saturating_add(1), Ordering::Relaxed);
        }
    }
}

impl Default for BankStore {
    fn default() -> Self {
        Self::new()
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub banks: BankStore,
    pub coordinator: Coordinator,
}

impl AppState {
    /// Build state around a bank store and a coordinator over the same store.
    pub fn new(banks: BankStore, coordinator: Coordinator) -> Self {
        Self { banks, coordinator }
    }
}
