//! The account store as seen by the bank service.
//!
//! The coordinator only ever talks to this trait. Production code uses
//! [`AccountStoreClient`](crate::AccountStoreClient); tests substitute an
//! in-memory fake that counts calls.

use async_trait::async_trait;
use bnk_core::{Account, AccountId, AccountPayload, BankId};

use crate::error::AccountStoreError;

/// Remote account store protocol.
///
/// | Method | Path | Operation |
/// |--------|------|-----------|
/// | GET    | `/accounts/bank/{bankId}` | [`list_by_bank`](Self::list_by_bank) |
/// | POST   | `/accounts` | [`create`](Self::create) |
/// | PUT    | `/accounts/{accountId}` | [`update`](Self::update) |
/// | DELETE | `/accounts/{accountId}` | [`delete`](Self::delete) |
/// | DELETE | `/accounts/bank/{bankId}` | [`delete_by_bank`](Self::delete_by_bank) |
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Accounts referencing `bank_id`, in store order. Empty if none.
    async fn list_by_bank(&self, bank_id: BankId) -> Result<Vec<Account>, AccountStoreError>;

    /// Store a new account and return it with its assigned id.
    async fn create(&self, payload: &AccountPayload) -> Result<Account, AccountStoreError>;

    /// Replace the account at `account_id`.
    async fn update(
        &self,
        account_id: AccountId,
        payload: &AccountPayload,
    ) -> Result<Account, AccountStoreError>;

    /// Remove one account.
    async fn delete(&self, account_id: AccountId) -> Result<(), AccountStoreError>;

    /// Remove every account referencing `bank_id`.
    async fn delete_by_bank(&self, bank_id: BankId) -> Result<(), AccountStoreError>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> Result<(), AccountStoreError> {
        Ok(())
    }
}
