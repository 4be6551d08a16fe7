use std::time::Duration;

use crate::ErrorKind;

/// Retry budget and backoff base for failed requests.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt. Zero disables
    /// retries entirely.
    pub max_attempts: usize,
    /// Base backoff delay; doubled for each consecutive retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

/// Verdict for a single failed attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryDecision {
    /// Whether another attempt should be made.
    pub retry: bool,
    /// How long to wait before that attempt. Zero when `retry` is false.
    pub delay: Duration,
}

impl RetryDecision {
    fn give_up() -> Self {
        Self {
            retry: false,
            delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    /// Decides whether the failure of retry slot `retry_index` (0 for the
    /// first retry) warrants another attempt, and with what delay.
    ///
    /// Only transient failures (network, timeout, 5xx) are retried; client
    /// errors and cancellation always give up immediately. Pure function,
    /// safe to call concurrently for independent requests.
    pub fn decide(&self, retry_index: usize, kind: ErrorKind) -> RetryDecision {
        if !kind.is_transient() || retry_index >= self.max_attempts {
            return RetryDecision::give_up();
        }
        RetryDecision {
            retry: true,
            delay: self.delay_for(retry_index),
        }
    }

    /// Exponential backoff: `base_delay * 2^retry_index`, with the exponent
    /// capped and the multiply saturating so large indexes cannot overflow.
    fn delay_for(&self, retry_index: usize) -> Duration {
        let exp = retry_index.min(16) as u32;
        let multiplier = 1u32 << exp;
        self.base_delay.saturating_mul(multiplier)
    }
}
