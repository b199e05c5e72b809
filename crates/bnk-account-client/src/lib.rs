//! # bnk-account-client -- Typed client for the account service
//!
//! The bank service reaches accounts only through this crate. The
//! [`AccountDirectory`] trait is the seam the coordinator is written
//! against; [`AccountStoreClient`] is its reqwest implementation.
//!
//! ## Remote-Call Policy
//!
//! - Reads (`list_by_bank`) are retried with exponential backoff on
//!   transport errors, up to `read_retries` times, each retry logged.
//! - Writes and deletes are sent exactly once. The account service has no
//!   idempotency keys, so a retried create could store two accounts.
//! - Every request carries the configured timeout.

pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub(crate) mod retry;

pub use client::AccountStoreClient;
pub use config::AccountStoreConfig;
pub use directory::AccountDirectory;
pub use error::AccountStoreError;
