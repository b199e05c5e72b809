//! # Account Records
//!
//! Accounts are owned by the account service. The `bank_id` field is a
//! *weak* reference: the account service stores whatever it is given and
//! never checks that the bank exists. Only the bank service's coordinator
//! enforces that, and only on the bank-scoped entry points.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::identity::{AccountId, BankId};

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Store-assigned identifier.
    pub id: AccountId,
    /// Customer-facing account number.
    #[serde(default)]
    pub account_number: i64,
    /// Free-form classification ("savings", "checking", ...).
    #[serde(default)]
    pub account_type: String,
    /// Balance in minor units. May be negative.
    #[serde(default)]
    pub balance: i64,
    /// Owning bank.
    pub bank_id: BankId,
}

/// Client-supplied account fields for create and full update.
///
/// `bank_id` is optional on the wire because bank-scoped callers never need
/// to send it: the coordinator stamps it from the request path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountPayload {
    /// Customer-facing account number.
    #[serde(default)]
    pub account_number: i64,
    /// Free-form classification.
    #[serde(default)]
    pub account_type: String,
    /// Balance in minor units.
    #[serde(default)]
    pub balance: i64,
    /// Owning bank, if the caller supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<BankId>,
}

impl AccountPayload {
    /// Overwrite the bank reference with `bank_id`, whatever the caller sent.
    pub fn stamped(mut self, bank_id: BankId) -> Self {
        self.bank_id = Some(bank_id);
        self
    }

    /// The bank reference, which the account store requires.
    pub fn require_bank(&self) -> Result<BankId, ValidationError> {
        self.bank_id
            .ok_or(ValidationError::Missing { field: "bankId" })
    }

    /// Materialize the payload under a store-assigned id.
    pub fn into_account(self, id: AccountId) -> Result<Account, ValidationError> {
        let bank_id = self.require_bank()?;
        Ok(Account {
            id,
            account_number: self.account_number,
            account_type: self.account_type,
            balance: self.balance,
            bank_id,
        })
    }
}
