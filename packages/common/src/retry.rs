use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::Deserialize;
use tracing::warn;

/// Bounded retry settings for store reads.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first failure. Default: 3.
    #[serde(default = "default_max_retries")]
    pub max_retries: u8,
    /// Delay before the first retry. Default: 50ms.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for any single delay. Default: 1000ms.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_retries() -> u8 {
    3
}
fn default_base_delay_ms() -> u64 {
    50
}
fn default_max_delay_ms() -> u64 {
    1000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryPolicy {
    /// A policy that gives up after the first failure.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Calculate exponential backoff delay with jitter.
///
/// Formula: `min(base_ms * 2^(attempt-1) + jitter, max_ms)` (0-25% jitter)
pub fn calculate_backoff(attempt: u8, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exp_factor = 2u64.saturating_pow((attempt - 1) as u32);
    let delay_ms = base_ms.saturating_mul(exp_factor);

    let jitter = if delay_ms > 0 {
        rand::rng().random_range(0..=delay_ms / 4)
    } else {
        0
    };

    let total_delay = delay_ms.saturating_add(jitter).min(max_ms);
    Duration::from_millis(total_delay)
}

/// Errors that may succeed if the same operation is tried again.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

#[cfg(feature = "sea-orm")]
impl Transient for sea_orm::DbErr {
    /// Lost connections and pool exhaustion. A failing query fails the same
    /// way on every attempt.
    fn is_transient(&self) -> bool {
        matches!(
            self,
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_)
        )
    }
}

/// Run a read, retrying transient failures with backoff until the policy is
/// exhausted. Other failures are returned immediately.
///
/// Only use this for operations that are safe to repeat. Writes go through
/// once and report their failure to the caller.
pub async fn retry_read<T, E, F, Fut>(policy: &RetryPolicy, op: &str, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display + Transient,
{
    let mut attempt: u8 = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = calculate_backoff(attempt, policy.base_delay_ms, policy.max_delay_ms);
                warn!(
                    op,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Store read failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
