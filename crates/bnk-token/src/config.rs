//! Token configuration loaded from the environment.
//!
//! Variables:
//! - `JWT_SECRET` (required): base64, at least 32 bytes once decoded
//! - `JWT_TTL_SECS` (default: 1800)

use crate::issuer::{TokenIssuer, DEFAULT_TTL_SECS};
use crate::secret::{SecretError, SigningSecret};
use crate::validator::TokenValidator;

/// Signing secret plus token lifetime.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Shared HMAC key.
    pub secret: SigningSecret,
    /// Validity window for newly issued tokens.
    pub ttl_secs: u64,
}

impl TokenConfig {
    /// Load from `JWT_SECRET` and `JWT_TTL_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;
        let secret = SigningSecret::from_base64(&raw)?;
        let ttl_secs = match lookup("JWT_TTL_SECS") {
            None => DEFAULT_TTL_SECS,
            Some(v) => match v.trim().parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidTtl(v)),
            },
        };
        Ok(Self { secret, ttl_secs })
    }

    /// Issuer over this configuration.
    pub fn issuer(&self) -> TokenIssuer {
        TokenIssuer::new(&self.secret, self.ttl_secs)
    }

    /// Validator over this configuration.
    pub fn validator(&self) -> TokenValidator {
        TokenValidator::new(&self.secret)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `JWT_SECRET` unset or empty.
    #[error("JWT_SECRET environment variable is required")]
    MissingSecret,
    /// `JWT_SECRET` did not decode to a usable key.
    #[error("invalid JWT_SECRET: {0}")]
    Secret(#[from] SecretError),
    /// `JWT_TTL_SECS` is not a positive integer.
    #[error("invalid JWT_TTL_SECS: {0:?}")]
    InvalidTtl(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_ttl_to_thirty_minutes() {
        let secret = STANDARD.encode([3u8; 32]);
        let cfg = TokenConfig::from_lookup(lookup(&[("JWT_SECRET", &secret)])).unwrap();
        assert_eq!(cfg.ttl_secs, 1800);
    }

    #[test]
    fn reads_custom_ttl() {
        let secret = STANDARD.encode([3u8; 32]);
        let cfg = TokenConfig::from_lookup(lookup(&[
            ("JWT_SECRET", &secret),
            ("JWT_TTL_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(cfg.ttl_secs, 60);
        assert_eq!(cfg.issuer().ttl().as_secs(), 60);
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(matches!(
            TokenConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingSecret)
        ));
        assert!(matches!(
            TokenConfig::from_lookup(lookup(&[("JWT_SECRET", "  ")])),
            Err(ConfigError::MissingSecret)
        ));
    }

    #[test]
    fn rejects_zero_or_garbage_ttl() {
        let secret = STANDARD.encode([3u8; 32]);
        for bad in ["0", "-5", "soon"] {
            let result =
                TokenConfig::from_lookup(lookup(&[("JWT_SECRET", &secret), ("JWT_TTL_SECS", bad)]));
            assert!(matches!(result, Err(ConfigError::InvalidTtl(_))), "{bad}");
        }
    }

    #[test]
    fn issuer_and_validator_share_the_secret() {
        let secret = STANDARD.encode([5u8; 40]);
        let cfg = TokenConfig::from_lookup(lookup(&[("JWT_SECRET", &secret)])).unwrap();
        let token = cfg.issuer().issue("alice").unwrap();
        assert_eq!(cfg.validator().subject(&token).unwrap(), "alice");
    }
}
