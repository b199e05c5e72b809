//! Account service client configuration.
//!
//! Defaults point at a locally running account service. Override via
//! environment variables or explicit construction for tests.

use std::time::Duration;

use url::Url;

/// Default base URL of the account service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8082";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default number of retries for idempotent reads.
pub const DEFAULT_READ_RETRIES: u32 = 2;

/// Configuration for connecting to the account service.
#[derive(Debug, Clone)]
pub struct AccountStoreConfig {
    /// Base URL; request paths are appended after it.
    pub base_url: Url,
    /// Request timeout applied by the HTTP client.
    pub timeout: Duration,
    /// Retries after the first attempt for reads. Writes are never retried.
    pub read_retries: u32,
}

impl AccountStoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ACCOUNT_SERVICE_URL` (default: `http://127.0.0.1:8082`)
    /// - `ACCOUNT_SERVICE_TIMEOUT_MS` (default: 5000)
    /// - `ACCOUNT_SERVICE_READ_RETRIES` (default: 2)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("ACCOUNT_SERVICE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let base_url = parse_url("ACCOUNT_SERVICE_URL", &raw)?;
        Ok(Self {
            base_url,
            timeout: Duration::from_millis(env_number(
                "ACCOUNT_SERVICE_TIMEOUT_MS",
                DEFAULT_TIMEOUT_MS,
            )?),
            read_retries: env_number("ACCOUNT_SERVICE_READ_RETRIES", DEFAULT_READ_RETRIES)?,
        })
    }

    /// Longest a read can take: every attempt running to the request
    /// timeout, plus the backoff slept between them. A caller bounding a
    /// read with less than this cuts off the retries.
    pub fn read_budget(&self) -> Duration {
        let attempts = self.read_retries.saturating_add(1);
        self.timeout
            .checked_mul(attempts)
            .and_then(|t| t.checked_add(crate::retry::total_backoff(self.read_retries)))
            .unwrap_or(Duration::MAX)
    }

    /// Configuration pointing at `base_url` with default timeout and retries.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base_url)?,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            read_retries: DEFAULT_READ_RETRIES,
        })
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_number<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(var.to_string(), raw)),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A URL variable did not parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// A numeric variable did not parse.
    #[error("invalid number for {0}: {1:?}")]
    InvalidNumber(String, String),
}
