//! Bounded retry with rate-limit-aware backoff.
//!
//! One parametrized controller shared by every call site; only the
//! attempt budgets differ per site. Policy per error class:
//!
//! - `RateLimited`: sleep (server-advised wait when present, else
//!   exponential backoff with jitter), then retry within the budget.
//! - `Provider`: retry within the budget without sleeping.
//! - `Unexpected`: returned to the call site immediately; whether that
//!   aborts the run or degrades to a placeholder is the caller's decision.
//!
//! A spent budget yields [`TpgError::Exhausted`] wrapping the last error.

use rand::Rng;
use std::{future::Future, time::Duration};
use tpgen_core::{Result, TpgError};

#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Total attempt budget, including the first call.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }
}

/// Delay before retrying a rate-limited attempt.
///
/// A server-advised wait is honored as-is. Otherwise the delay grows as
/// `base_delay * 2^attempt` plus up to one second of jitter, capped at
/// `max_delay`.
pub fn backoff_delay(attempt: u32, config: &RetryConfig, advised: Option<Duration>) -> Duration {
    if let Some(wait) = advised {
        return wait;
    }
    let exponential = config.base_delay.as_secs_f64() * 2f64.powi(attempt.min(30) as i32);
    let jitter: f64 = rand::rng().random();
    Duration::from_secs_f64(exponential + jitter).min(config.max_delay)
}

/// Run `operation` under the retry policy, returning the first success or
/// the escalated terminal error.
pub async fn execute_with_retry<T, Op, Fut>(config: &RetryConfig, mut operation: Op) -> Result<T>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error @ TpgError::RateLimited { .. }) => {
                attempt += 1;
                if attempt >= config.max_attempts {
                    return Err(TpgError::Exhausted { attempts: attempt, source: Box::new(error) });
                }
                let delay = backoff_delay(attempt - 1, config, error.retry_after());
                tracing::warn!(
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "provider rate limited; backing off before retry"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error @ TpgError::Provider(_)) => {
                attempt += 1;
                if attempt >= config.max_attempts {
                    return Err(TpgError::Exhausted { attempts: attempt, source: Box::new(error) });
                }
                tracing::warn!(
                    attempt,
                    max_attempts = config.max_attempts,
                    error = %error,
                    "provider request failed; retrying"
                );
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    fn zero_delay(max_attempts: u32) -> RetryConfig {
        RetryConfig::default()
            .with_max_attempts(max_attempts)
            .with_base_delay(Duration::ZERO)
            .with_max_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn rate_limited_retries_until_success() {
        let attempts = Arc::new(AtomicU32::new(0));

        let result = execute_with_retry(&zero_delay(5), || {
            let attempts = Arc::clone(&attempts);
            async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    return Err(TpgError::RateLimited { retry_after: None });
                }
                Ok("ok")
            }
        })
        .await
        .expect("operation should succeed after retries");

        assert_eq!(result, "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn provider_errors_retry_up_to_budget_then_exhaust() {
        let attempts = Arc::new(AtomicU32::new(0));

        let error = execute_with_retry(&zero_delay(4), || {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TpgError::Provider("server fault".to_string()))
            }
        })
        .await
        .expect_err("budget exhaustion should escalate");

        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        match error {
            TpgError::Exhausted { attempts, source } => {
                assert_eq!(attempts, 4);
                assert!(matches!(*source, TpgError::Provider(_)));
            }
            other => panic!("expected Exhausted, got {other}"),
        }
    }

    #[tokio::test]
    async fn unexpected_error_returns_without_retry() {
        let attempts = Arc::new(AtomicU32::new(0));

        let error = execute_with_retry(&zero_delay(10), || {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TpgError::Unexpected("connection refused".to_string()))
            }
        })
        .await
        .expect_err("unexpected errors are not retried");

        assert!(matches!(error, TpgError::Unexpected(_)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn single_attempt_budget_never_retries() {
        let attempts = Arc::new(AtomicU32::new(0));

        let error = execute_with_retry(&zero_delay(1), || {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TpgError::RateLimited { retry_after: None })
            }
        })
        .await
        .expect_err("budget of one should fail on first error");

        assert!(matches!(error, TpgError::Exhausted { attempts: 1, .. }));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_honors_server_advised_wait() {
        let config = RetryConfig::default().with_max_delay(Duration::from_secs(2));
        let delay = backoff_delay(3, &config, Some(Duration::from_secs(30)));
        assert_eq!(delay, Duration::from_secs(30));
    }

    #[test]
    fn backoff_grows_geometrically_with_jitter() {
        let config = RetryConfig::default()
            .with_base_delay(Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(600));
        for attempt in 0..4 {
            let delay = backoff_delay(attempt, &config, None);
            let floor = Duration::from_secs(1 << attempt);
            assert!(delay >= floor, "attempt {attempt}: {delay:?} < {floor:?}");
            assert!(delay < floor + Duration::from_secs(1));
        }
    }

    #[test]
    fn backoff_is_capped_at_max_delay() {
        let config = RetryConfig::default()
            .with_base_delay(Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(5));
        let delay = backoff_delay(10, &config, None);
        assert_eq!(delay, Duration::from_secs(5));
    }
}
