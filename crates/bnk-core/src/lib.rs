#![deny(missing_docs)]

//! # bnk-core — Foundational Types for the Bank Stack
//!
//! Every other crate in the workspace depends on this one. It has no
//! internal crate dependencies, only `serde`, `thiserror`, `chrono` and
//! `utoipa` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype identifiers.** A [`BankId`] cannot be passed where an
//!    [`AccountId`] is expected, even though both are store-assigned `i64`s.
//!
//! 2. **Banks never reference accounts.** The [`Bank`] record lives in the
//!    bank service; the [`Account`] record lives in the account service and
//!    carries a weak [`BankId`] reference that no store verifies on its own.
//!
//! 3. **One error body.** Every service renders rejections as an
//!    [`ErrorBody`] (`{statusCode, code, message, timestamp}`).

pub mod account;
pub mod bank;
pub mod credential;
pub mod error;
pub mod identity;
pub mod response;

pub use account::{Account, AccountPayload};
pub use bank::{Bank, BankDraft};
pub use credential::NewCredential;
pub use error::ValidationError;
pub use identity::{AccountId, BankId};
pub use response::ErrorBody;
