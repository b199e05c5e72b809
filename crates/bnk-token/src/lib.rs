//! # bnk-token — Bearer Token Protocol
//!
//! Issues and validates signed bearer tokens bound to a username and an
//! expiry. The only state is the [`SigningSecret`], loaded once at startup
//! and immutable for the life of the process.
//!
//! ## Split Roles
//!
//! Issuance and validation are separate types:
//!
//! - [`TokenIssuer`] lives in the auth service, next to the credential
//!   store. It signs `{sub, iat, exp}` claims.
//! - [`TokenValidator`] is all the gateway gets. It verifies structure and
//!   signature, then expiry, and is a pure function of
//!   `(token, secret, now)`: no side effects, safe to call from any number
//!   of tasks at once.
//!
//! ## Failure Classes
//!
//! | Outcome | [`TokenError`] |
//! |---------|----------------|
//! | bad structure, bad signature, wrong algorithm | `Malformed` |
//! | signature ok, `exp` in the past | `Expired` |

pub mod claims;
pub mod config;
pub mod error;
pub mod issuer;
pub mod secret;
pub mod validator;

pub use claims::Claims;
pub use config::{ConfigError, TokenConfig};
pub use error::TokenError;
pub use issuer::TokenIssuer;
pub use secret::{SecretError, SigningSecret};
pub use validator::TokenValidator;
