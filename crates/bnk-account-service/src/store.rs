//! In-memory account storage using DashMap.
//!
//! Ids are assigned from a monotonically increasing counter starting at 1.
//! Listings are returned in id order, which is also creation order.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use bnk_core::{Account, AccountId, AccountPayload, BankId, ValidationError};
use dashmap::DashMap;

struct Inner {
    accounts: DashMap<AccountId, Account>,
    next_id: AtomicI64,
}

/// Shared account store.
///
/// Cheaply cloneable via `Arc`; all clones share the same data.
#[derive(Clone)]
pub struct AccountStore {
    inner: Arc<Inner>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                accounts: DashMap::new(),
                next_id: AtomicI64::new(1),
            }),
        }
    }

    /// Store a new account. The payload must carry a bank reference, but the
    /// referenced bank is not checked: this store has no view of banks.
    pub fn create(&self, payload: AccountPayload) -> Result<Account, ValidationError> {
        payload.require_bank()?;
        let id = AccountId::new(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let account = payload.into_account(id)?;
        self.inner.accounts.insert(id, account.clone());
        Ok(account)
    }

    pub fn get(&self, id: AccountId) -> Option<Account> {
        self.inner.accounts.get(&id).map(|entry| entry.value().clone())
    }

    pub fn list(&self) -> Vec<Account> {
        self.sorted(|_| true)
    }

    pub fn list_by_bank(&self, bank_id: BankId) -> Vec<Account> {
        self.sorted(|account| account.bank_id == bank_id)
    }

    /// Replace every field of an account. A payload without a bank
    /// reference keeps the current one.
    pub fn update(&self, id: AccountId, payload: AccountPayload) -> Option<Account> {
        let mut entry = self.inner.accounts.get_mut(&id)?;
        let account = entry.value_mut();
        account.account_number = payload.account_number;
        account.account_type = payload.account_type;
        account.balance = payload.balance;
        if let Some(bank_id) = payload.bank_id {
            account.bank_id = bank_id;
        }
        Some(account.clone())
    }

    pub fn remove(&self, id: AccountId) -> Option<Account> {
        self.inner.accounts.remove(&id).map(|(_, account)| account)
    }

    /// Remove every account referencing `bank_id`; returns how many went.
    pub fn remove_by_bank(&self, bank_id: BankId) -> usize {
        let mut removed = 0;
        self.inner.accounts.retain(|_, account| {
            let keep = account.bank_id != bank_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.accounts.is_empty()
    }

    fn sorted(&self, keep: impl Fn(&Account) -> bool) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .inner
            .accounts
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.id);
        accounts
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(bank: i64, number: i64) -> AccountPayload {
        AccountPayload {
            account_number: number,
            account_type: "savings".into(),
            balance: 100,
            bank_id: Some(BankId::new(bank)),
        }
    }

    #[test]
    fn assigns_increasing_ids() {
        let store = AccountStore::new();
        let a = store.create(payload(1, 10)).unwrap();
        let b = store.create(payload(1, 11)).unwrap();
        assert_eq!(a.id, AccountId::new(1));
        assert_eq!(b.id, AccountId::new(2));
    }

    #[test]
    fn create_requires_bank_reference() {
        let store = AccountStore::new();
        let err = store.create(AccountPayload::default()).unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "bankId" });
        assert!(store.is_empty());
    }

    #[test]
    fn create_accepts_unknown_bank() {
        let store = AccountStore::new();
        let account = store.create(payload(404, 1)).unwrap();
        assert_eq!(account.bank_id, BankId::new(404));
    }

    #[test]
    fn list_by_bank_filters_and_orders() {
        let store = AccountStore::new();
        store.create(payload(1, 10)).unwrap();
        store.create(payload(2, 20)).unwrap();
        store.create(payload(1, 11)).unwrap();
        let numbers: Vec<_> = store
            .list_by_bank(BankId::new(1))
            .into_iter()
            .map(|a| a.account_number)
            .collect();
        assert_eq!(numbers, vec![10, 11]);
        assert!(store.list_by_bank(BankId::new(3)).is_empty());
    }

    #[test]
    fn update_keeps_bank_when_not_supplied() {
        let store = AccountStore::new();
        let created = store.create(payload(7, 1)).unwrap();
        let updated = store
            .update(
                created.id,
                AccountPayload {
                    balance: -50,
                    ..AccountPayload::default()
                },
            )
            .unwrap();
        assert_eq!(updated.bank_id, BankId::new(7));
        assert_eq!(updated.balance, -50);
        assert!(store.update(AccountId::new(99), payload(7, 1)).is_none());
    }

    #[test]
    fn remove_by_bank_leaves_other_banks() {
        let store = AccountStore::new();
        store.create(payload(1, 10)).unwrap();
        store.create(payload(1, 11)).unwrap();
        store.create(payload(2, 20)).unwrap();
        assert_eq!(store.remove_by_bank(BankId::new(1)), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove_by_bank(BankId::new(1)), 0);
    }
}
