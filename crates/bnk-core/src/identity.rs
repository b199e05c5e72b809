//! # Identifier Newtypes
//!
//! Banks and accounts are identified by opaque numeric ids assigned by
//! their owning store. The wire format is a bare JSON number.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Store-assigned identifier of a bank.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct BankId(i64);

impl BankId {
    /// Wrap a raw id.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw numeric value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BankId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Store-assigned identifier of an account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    /// Wrap a raw id.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw numeric value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AccountId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}
