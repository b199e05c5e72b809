//! Gateway configuration.
//!
//! Variables:
//! - `PORT` (default: 8080)
//! - `JWT_SECRET` (required), shared with the auth service
//! - `BANK_SERVICE_URL` (default: `http://127.0.0.1:8081`)
//! - `ACCOUNT_SERVICE_URL` (default: `http://127.0.0.1:8082`)
//! - `AUTH_SERVICE_URL` (default: `http://127.0.0.1:8083`)
//! - `UPSTREAM_TIMEOUT_MS` (default: 10000)

use std::time::Duration;

use bnk_token::{ConfigError as TokenConfigError, TokenConfig};
use url::Url;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BANK_SERVICE_URL: &str = "http://127.0.0.1:8081";
pub const DEFAULT_ACCOUNT_SERVICE_URL: &str = "http://127.0.0.1:8082";
pub const DEFAULT_AUTH_SERVICE_URL: &str = "http://127.0.0.1:8083";
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 10_000;

/// Where each route family is forwarded.
#[derive(Debug, Clone)]
pub struct UpstreamUrls {
    pub bank: Url,
    pub accounts: Url,
    pub auth: Url,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    /// Only the secret is used; the gateway never issues tokens.
    pub tokens: TokenConfig,
    pub upstreams: UpstreamUrls,
    /// Bound on one forwarded request, connect to last byte.
    pub upstream_timeout: Duration,
}

impl GatewayConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("PORT".into(), raw))?,
        };
        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_MS") {
            None => DEFAULT_UPSTREAM_TIMEOUT_MS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => return Err(ConfigError::InvalidNumber("UPSTREAM_TIMEOUT_MS".into(), raw)),
            },
        };
        let url = |var: &str, default: &str| -> Result<Url, ConfigError> {
            let raw = lookup(var).unwrap_or_else(|| default.to_string());
            Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
        };
        Ok(Self {
            port,
            tokens: TokenConfig::from_lookup(&lookup)?,
            upstreams: UpstreamUrls {
                bank: url("BANK_SERVICE_URL", DEFAULT_BANK_SERVICE_URL)?,
                accounts: url("ACCOUNT_SERVICE_URL", DEFAULT_ACCOUNT_SERVICE_URL)?,
                auth: url("AUTH_SERVICE_URL", DEFAULT_AUTH_SERVICE_URL)?,
            },
            upstream_timeout: Duration::from_millis(upstream_timeout),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Token(#[from] TokenConfigError),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid number for {0}: {1:?}")]
    InvalidNumber(String, String),
}
