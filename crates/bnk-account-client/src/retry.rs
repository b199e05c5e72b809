//! Retry with exponential backoff for idempotent account service reads.
//!
//! Only transport errors (connection failures, timeouts) are retried. Any
//! HTTP response, whatever its status, is handed back to the caller.

use std::time::Duration;

/// Base delay between retries (doubles each attempt: 100ms, 200ms, 400ms).
const BASE_DELAY_MS: u64 = 100;

/// Delay before retry number `attempt` (zero-based).
pub(crate) fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BASE_DELAY_MS << attempt.min(10))
}

/// Sum of every delay slept across `max_retries` retries.
pub(crate) fn total_backoff(max_retries: u32) -> Duration {
    (0..max_retries).map(backoff).sum()
}

/// Send a request, retrying up to `max_retries` times on transport errors.
///
/// The closure `f` is called at most `max_retries + 1` times. Every failed
/// attempt that is followed by a retry is logged at WARN.
pub(crate) async fn retry_send<F, Fut>(
    endpoint: &str,
    max_retries: u32,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..max_retries {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                let delay = backoff(attempt);
                tracing::warn!(
                    endpoint,
                    attempt = attempt + 1,
                    max_retries,
                    "account service request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    f().await
}
