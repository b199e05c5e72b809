//! Account service client error types.

/// Errors from account service calls.
#[derive(Debug, thiserror::Error)]
pub enum AccountStoreError {
    /// HTTP transport error (connect, timeout, reset).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The account service returned a non-2xx status.
    #[error("account service {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl AccountStoreError {
    /// The account service answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// The account service could not be reached or did not answer in time.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http { .. })
    }
}
