//! APS Retry Logic
//!
//! 一時的なエラーに対する指数バックオフ付きリトライ

use std::future::Future;
use std::time::Duration;

use log::warn;

use super::error::ApiError;

pub const MAX_RETRIES: u32 = 3;
pub const INITIAL_RETRY_DELAY_MS: u64 = 1000; // 1 second
pub const MAX_RETRY_DELAY_MS: u64 = 32000; // 32 seconds max

/// Calculate retry delay with exponential backoff
pub fn calculate_retry_delay(retry_count: u32) -> u64 {
    let shift = retry_count.saturating_sub(1).min(16);
    std::cmp::min(INITIAL_RETRY_DELAY_MS * (1 << shift), MAX_RETRY_DELAY_MS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, for non-idempotent calls
    pub fn none() -> Self {
        Self { max_retries: 0 }
    }

    pub fn delay_for(&self, retry_count: u32) -> Duration {
        Duration::from_millis(calculate_retry_delay(retry_count))
    }
}

/// Run `attempt` until it succeeds, fails permanently, or retries run out.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut attempt: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut retry_count = 0;

    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && retry_count < policy.max_retries => {
                retry_count += 1;
                let delay = policy.delay_for(retry_count);
                warn!(
                    "{} failed (retry {}/{}): {}. Retrying in {}ms...",
                    operation,
                    retry_count,
                    policy.max_retries,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
