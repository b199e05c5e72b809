//! Bank service configuration, loaded once at startup.

use bnk_account_client::config::ConfigError as AccountConfigError;
use bnk_account_client::AccountStoreConfig;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8081;

/// Bank service configuration.
#[derive(Clone)]
pub struct BankServiceConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Where and how to reach the account service.
    pub accounts: AccountStoreConfig,
    /// Postgres URL. `None` means in-memory only.
    pub database_url: Option<String>,
}

impl BankServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// - `PORT` (default: 8081)
    /// - `ACCOUNT_SERVICE_URL`, `ACCOUNT_SERVICE_TIMEOUT_MS`,
    ///   `ACCOUNT_SERVICE_READ_RETRIES`, see [`AccountStoreConfig::from_env`]
    /// - `DATABASE_URL` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Err(_) => DEFAULT_PORT,
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
        };
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        Ok(Self {
            port,
            accounts: AccountStoreConfig::from_env()?,
            database_url,
        })
    }
}

// The database URL may carry a password.
impl std::fmt::Debug for BankServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankServiceConfig")
            .field("port", &self.port)
            .field("accounts", &self.accounts)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),
    #[error(transparent)]
    Accounts(#[from] AccountConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_database_url() {
        let config = BankServiceConfig {
            port: DEFAULT_PORT,
            accounts: AccountStoreConfig::new("http://127.0.0.1:8082").unwrap(),
            database_url: Some("postgres://bank:hunter2@db/bank".into()),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
