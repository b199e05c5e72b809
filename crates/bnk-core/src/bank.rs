//! # Bank Records
//!
//! A bank is owned exclusively by the bank service. It holds no reference
//! to its accounts: those live in the account service and point back at
//! the bank through [`Account::bank_id`](crate::Account::bank_id).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{require_non_blank, ValidationError};
use crate::identity::BankId;

/// A stored bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    /// Store-assigned identifier.
    pub id: BankId,
    /// Display name of the bank.
    pub name: String,
    /// Free-form location (city, address, ...).
    #[serde(default)]
    pub location: String,
    /// Branch code as issued by the bank.
    #[serde(default)]
    pub branch_code: String,
}

/// Client-supplied bank fields, used for both create and full update.
///
/// Any `id` in the request body is ignored; the store assigns ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankDraft {
    /// Display name of the bank.
    pub name: String,
    /// Free-form location.
    #[serde(default)]
    pub location: String,
    /// Branch code.
    #[serde(default)]
    pub branch_code: String,
}

impl BankDraft {
    /// Check the draft's business rules (a bank must be named).
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("name", &self.name)
    }

    /// Materialize the draft under a store-assigned id.
    pub fn into_bank(self, id: BankId) -> Bank {
        Bank {
            id,
            name: self.name,
            location: self.location,
            branch_code: self.branch_code,
        }
    }
}

impl Bank {
    /// Replace the mutable fields with those of `draft`, keeping the id.
    pub fn apply(&mut self, draft: BankDraft) {
        self.name = draft.name;
        self.location = draft.location;
        self.branch_code = draft.branch_code;
    }
}
