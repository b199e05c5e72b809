//! # Bank-Account Consistency Coordinator
//!
//! Banks live here; their accounts live in the account service. There is
//! no shared transaction, so every bank-scoped account operation is one
//! local precondition check plus at most one remote call (and, for delete
//! bank, one local mutation after it):
//!
//! ```text
//! START → LOCAL_PRECONDITION_CHECK → { BankNotFound | REMOTE_CALL }
//!       → { Upstream* | LOCAL_MUTATION (delete bank only) | DONE }
//! ```
//!
//! ## Guarantees
//!
//! - An absent bank fails with [`CoordinatorError::BankNotFound`] before any
//!   remote call is made.
//! - Created and updated accounts always carry the bank id from the path,
//!   whatever the caller sent.
//! - Deleting a bank deletes its accounts remotely first. The bank is
//!   removed locally only after that succeeds; otherwise it stays and the
//!   caller gets [`CoordinatorError::DependencyDeletionFailed`].
//! - Every remote call is bounded by a timeout. Elapse counts as
//!   [`CoordinatorError::UpstreamUnavailable`].
//! - Each operation runs on its own spawned task, so a client that hangs
//!   up does not cancel it halfway.
//!
//! ## Create Versus Delete Bank
//!
//! A bank can be deleted while an account is being created under it.
//! Deleting a bank first marks it in the [`BankStore`]; from then on no
//! account operation starts against it. The mark is set before the remote
//! bulk delete and cleared once the bank is gone or the cleanup has failed.
//!
//! After a successful remote create the bank is checked again. If it is
//! marked or gone, the new account is deleted remotely and the caller gets
//! `BankNotFound`. A create whose recheck still saw the bank live returned
//! from the account service before the mark was set, so the bulk delete
//! that follows removes its account. If the compensating delete fails, the
//! orphan is logged at ERROR with its id. A create that races a delete whose
//! cleanup then fails is also reported as `BankNotFound` although the bank
//! stays. Updates and single-account deletes cannot add a reference to a
//! bank, so they skip the recheck.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bnk_account_client::{AccountDirectory, AccountStoreClient, AccountStoreConfig, AccountStoreError};
use bnk_core::{Account, AccountId, AccountPayload, BankId};
use thiserror::Error;

use crate::state::{BankStore, BankStoreError};

/// Outcome of a coordinated operation that did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    /// The bank does not exist locally.
    #[error("Bank not found: {0}")]
    BankNotFound(BankId),

    /// The account service has no such account.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// The account service could not be reached or did not answer in time.
    #[error("account service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The account service answered with something other than success.
    #[error("account service error: {0}")]
    UpstreamFailed(String),

    /// Deleting the bank's accounts failed; the bank was kept.
    #[error("could not delete accounts of bank {bank_id}: {reason}")]
    DependencyDeletionFailed { bank_id: BankId, reason: String },

    /// Local persistence or task failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<BankStoreError> for CoordinatorError {
    fn from(err: BankStoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// How a remote call went wrong, before it is given a meaning.
#[derive(Debug)]
enum RemoteFailure {
    NotFound,
    Unavailable(String),
    Failed(String),
}

impl RemoteFailure {
    fn reason(&self) -> String {
        match self {
            Self::NotFound => "not found".to_string(),
            Self::Unavailable(r) | Self::Failed(r) => r.clone(),
        }
    }

    /// The meaning shared by every operation except the not-found case.
    fn into_error(self, not_found: CoordinatorError) -> CoordinatorError {
        match self {
            Self::NotFound => not_found,
            Self::Unavailable(r) => CoordinatorError::UpstreamUnavailable(r),
            Self::Failed(r) => CoordinatorError::UpstreamFailed(r),
        }
    }
}

/// Orchestrates bank-scoped account operations.
///
/// Cheap to clone; clones share the bank store and the directory.
#[derive(Clone)]
pub struct Coordinator {
    banks: BankStore,
    accounts: Arc<dyn AccountDirectory>,
    call_timeout: Duration,
}

impl Coordinator {
    pub fn new(banks: BankStore, accounts: Arc<dyn AccountDirectory>, call_timeout: Duration) -> Self {
        Self {
            banks,
            accounts,
            call_timeout,
        }
    }

    /// A coordinator over a new [`AccountStoreClient`]. Remote calls are
    /// bounded by the client's read budget, so a read can use all its retries.
    pub fn connect(banks: BankStore, config: AccountStoreConfig) -> Result<Self, AccountStoreError> {
        let call_timeout = config.read_budget();
        let client = AccountStoreClient::new(config)?;
        Ok(Self::new(banks, Arc::new(client), call_timeout))
    }

    /// The remote account directory, for readiness checks.
    pub fn accounts(&self) -> &Arc<dyn AccountDirectory> {
        &self.accounts
    }

    /// Accounts referencing `bank_id`, in account-store order.
    pub async fn list_accounts(&self, bank_id: BankId) -> Result<Vec<Account>, CoordinatorError> {
        let this = self.clone();
        detached(async move {
            this.require_bank(bank_id)?;
            match this
                .call("list_by_bank", this.accounts.list_by_bank(bank_id))
                .await
            {
                Ok(accounts) => Ok(accounts),
                Err(RemoteFailure::NotFound) => Ok(Vec::new()),
                Err(failure) => Err(failure.into_error(CoordinatorError::BankNotFound(bank_id))),
            }
        })
        .await
    }

    /// Create an account under `bank_id`, overriding any bank in `payload`.
    pub async fn create_account(
        &self,
        bank_id: BankId,
        payload: AccountPayload,
    ) -> Result<Account, CoordinatorError> {
        let this = self.clone();
        detached(async move {
            this.require_bank(bank_id)?;
            let payload = payload.stamped(bank_id);
            let account = this
                .call("create", this.accounts.create(&payload))
                .await
                .map_err(|f| f.into_error(CoordinatorError::UpstreamFailed("create rejected".into())))?;

            if !this.banks.is_live(bank_id) {
                this.compensate_create(bank_id, account.id).await;
                return Err(CoordinatorError::BankNotFound(bank_id));
            }
            tracing::info!(bank_id = %bank_id, account_id = %account.id, "account created for bank");
            Ok(account)
        })
        .await
    }

    /// Replace account `account_id` under `bank_id`. Ownership of the
    /// account is not checked here; the account service decides.
    pub async fn update_account(
        &self,
        bank_id: BankId,
        account_id: AccountId,
        payload: AccountPayload,
    ) -> Result<Account, CoordinatorError> {
        let this = self.clone();
        detached(async move {
            this.require_bank(bank_id)?;
            let payload = payload.stamped(bank_id);
            let account = this
                .call("update", this.accounts.update(account_id, &payload))
                .await
                .map_err(|f| f.into_error(CoordinatorError::AccountNotFound(account_id)))?;
            tracing::info!(bank_id = %bank_id, account_id = %account_id, "account updated for bank");
            Ok(account)
        })
        .await
    }

    /// Delete account `account_id` under `bank_id`. Any remote failure is
    /// reported as [`CoordinatorError::AccountNotFound`].
    pub async fn delete_account(
        &self,
        bank_id: BankId,
        account_id: AccountId,
    ) -> Result<(), CoordinatorError> {
        let this = self.clone();
        detached(async move {
            this.require_bank(bank_id)?;
            if let Err(failure) = this.call("delete", this.accounts.delete(account_id)).await {
                tracing::warn!(
                    bank_id = %bank_id,
                    account_id = %account_id,
                    reason = %failure.reason(),
                    "remote account delete failed"
                );
                return Err(CoordinatorError::AccountNotFound(account_id));
            }
            tracing::info!(bank_id = %bank_id, account_id = %account_id, "account deleted for bank");
            Ok(())
        })
        .await
    }

    /// Delete every account of `bank_id` remotely, then the bank itself.
    pub async fn delete_bank(&self, bank_id: BankId) -> Result<(), CoordinatorError> {
        let this = self.clone();
        detached(async move {
            if !this.banks.begin_delete(bank_id) {
                return Err(CoordinatorError::BankNotFound(bank_id));
            }
            let outcome = this.remove_bank_and_accounts(bank_id).await;
            this.banks.end_delete(bank_id);
            outcome
        })
        .await
    }

    async fn remove_bank_and_accounts(&self, bank_id: BankId) -> Result<(), CoordinatorError> {
        if let Err(failure) = self
            .call("delete_by_bank", self.accounts.delete_by_bank(bank_id))
            .await
        {
            let reason = failure.reason();
            tracing::warn!(bank_id = %bank_id, reason = %reason, "account cleanup failed, bank kept");
            return Err(CoordinatorError::DependencyDeletionFailed { bank_id, reason });
        }
        match self.banks.remove(bank_id).await? {
            Some(_) => {
                tracing::info!(bank_id = %bank_id, "bank and its accounts deleted");
                Ok(())
            }
            None => Err(CoordinatorError::BankNotFound(bank_id)),
        }
    }

    fn require_bank(&self, bank_id: BankId) -> Result<(), CoordinatorError> {
        if self.banks.is_live(bank_id) {
            Ok(())
        } else {
            Err(CoordinatorError::BankNotFound(bank_id))
        }
    }

    async fn compensate_create(&self, bank_id: BankId, account_id: AccountId) {
        tracing::warn!(
            bank_id = %bank_id,
            account_id = %account_id,
            "bank deleted during account creation, removing new account"
        );
        if let Err(failure) = self.call("delete", self.accounts.delete(account_id)).await {
            tracing::error!(
                bank_id = %bank_id,
                account_id = %account_id,
                reason = %failure.reason(),
                "orphaned account left in account service"
            );
        }
    }

    /// Run one remote call under the timeout and classify its failure.
    async fn call<T, F>(&self, op: &'static str, fut: F) -> Result<T, RemoteFailure>
    where
        F: Future<Output = Result<T, AccountStoreError>>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Err(_) => {
                tracing::warn!(op, timeout = ?self.call_timeout, "account service call timed out");
                Err(RemoteFailure::Unavailable(format!(
                    "{op} timed out after {:?}",
                    self.call_timeout
                )))
            }
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if e.is_not_found() => Err(RemoteFailure::NotFound),
            Ok(Err(e)) if e.is_transport() => Err(RemoteFailure::Unavailable(e.to_string())),
            Ok(Err(e)) => Err(RemoteFailure::Failed(e.to_string())),
        }
    }
}

/// Run `fut` to completion on its own task, independent of the caller.
async fn detached<T, F>(fut: F) -> Result<T, CoordinatorError>
where
    F: Future<Output = Result<T, CoordinatorError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(fut)
        .await
        .map_err(|e| CoordinatorError::Internal(format!("coordinator task failed: {e}")))?
}
