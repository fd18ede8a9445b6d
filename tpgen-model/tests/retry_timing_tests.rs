//! Timing and property tests for the retry controller.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use proptest::prelude::*;
use tpgen_model::retry::{RetryConfig, backoff_delay, execute_with_retry};
use tpgen_core::TpgError;

/// Server-advised waits in a small range so the timing test stays fast
/// while still exercising the sleep path.
fn arb_retry_after_ms() -> impl Strategy<Value = u64> {
    10u64..50
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(25))]

    /// For any 429 carrying a retry-after of D, the controller waits at
    /// least D before the next attempt, regardless of its own backoff
    /// parameters.
    #[test]
    fn prop_advised_wait_is_respected(delay_ms in arb_retry_after_ms()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();

        let config = RetryConfig::default()
            .with_max_attempts(2)
            // Zero backoff so any observed delay comes from the hint.
            .with_base_delay(Duration::ZERO)
            .with_max_delay(Duration::ZERO);

        let attempts = Arc::new(AtomicU32::new(0));
        let first_attempt: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));
        let second_attempt: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));

        let attempts_c = Arc::clone(&attempts);
        let t1 = Arc::clone(&first_attempt);
        let t2 = Arc::clone(&second_attempt);

        let result = rt.block_on(execute_with_retry(&config, || {
            let attempts_c = Arc::clone(&attempts_c);
            let t1 = Arc::clone(&t1);
            let t2 = Arc::clone(&t2);
            async move {
                let attempt = attempts_c.fetch_add(1, Ordering::SeqCst);
                let now = Instant::now();
                if attempt == 0 {
                    *t1.lock().unwrap() = Some(now);
                    Err(TpgError::RateLimited {
                        retry_after: Some(Duration::from_millis(delay_ms)),
                    })
                } else {
                    *t2.lock().unwrap() = Some(now);
                    Ok("success")
                }
            }
        }));

        prop_assert!(result.is_ok(), "retry should succeed on second attempt");
        prop_assert_eq!(attempts.load(Ordering::SeqCst), 2);

        let t1_val = first_attempt.lock().unwrap().unwrap();
        let t2_val = second_attempt.lock().unwrap().unwrap();
        let elapsed = t2_val.duration_since(t1_val);

        // Allow a small tolerance for scheduling jitter.
        let min_expected = Duration::from_millis(delay_ms.saturating_sub(1));
        prop_assert!(
            elapsed >= min_expected,
            "elapsed {:?} should be >= {:?}",
            elapsed,
            min_expected,
        );
    }

    /// Without a hint the delay stays inside the geometric envelope.
    #[test]
    fn prop_backoff_envelope(attempt in 0u32..6, base_ms in 1u64..200) {
        let config = RetryConfig::default()
            .with_base_delay(Duration::from_millis(base_ms))
            .with_max_delay(Duration::from_secs(3600));
        let delay = backoff_delay(attempt, &config, None);
        let floor = Duration::from_millis(base_ms * (1 << attempt));
        prop_assert!(delay >= floor);
        prop_assert!(delay < floor + Duration::from_secs(1));
    }

    /// The cap bounds the delay for any attempt number.
    #[test]
    fn prop_backoff_capped(attempt in 0u32..64) {
        let config = RetryConfig::default()
            .with_base_delay(Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(10));
        let delay = backoff_delay(attempt, &config, None);
        prop_assert!(delay <= Duration::from_secs(10));
    }
}
