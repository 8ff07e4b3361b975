//! Exponential backoff for fetcher calls.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::RetryConfig;

/// Retry an async operation with exponential backoff.
///
/// With `max_retries == 0` the operation runs exactly once and its error is
/// returned untouched.
pub async fn retry<T, F, Fut>(policy: &RetryConfig, label: &str, f: F) -> anyhow::Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempt = 0u32;
    loop {
        match f().await {
            Ok(val) => return Ok(val),
            Err(e) if attempt < policy.max_retries => {
                let delay = backoff_delay(policy.base_delay_ms, attempt);
                warn!(
                    op = label,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Request failed, retrying: {:#}",
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn backoff_delay(base_delay_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt);
    Duration::from_millis(base_delay_ms.saturating_mul(factor))
}
