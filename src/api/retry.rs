//! Exponential backoff retry for admin API calls.
//!
//! Only [`ApiErrorKind::Server`] errors are retried, and only for calls the
//! caller marks as safe to repeat. Preflights and category lookups are
//! non-mutating and use [`RetryPolicy::RetryTransient`]; the commit always
//! uses [`RetryPolicy::NoRetry`].
//!
//! - Default: 2 retries with 500ms, 1s delays

use std::future::Future;
use std::time::Duration;

use super::error::{ApiError, ApiErrorKind};

/// Configuration for exponential backoff retry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,

    /// Initial delay before the first retry.
    pub initial_delay: Duration,

    /// Maximum delay between retries (cap for exponential growth).
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (typically 2.0).
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Default retry configuration.
    ///
    /// Kept short: a person is waiting on the preflight result.
    pub const DEFAULT: Self = Self {
        max_retries: 2,
        initial_delay: Duration::from_millis(500),
        max_delay: Duration::from_secs(4),
        backoff_multiplier: 2.0,
    };

    /// No retries at all.
    pub const NONE: Self = Self {
        max_retries: 0,
        initial_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
        backoff_multiplier: 1.0,
    };

    pub fn new(
        max_retries: u32,
        initial_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f64,
    ) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
            backoff_multiplier,
        }
    }

    /// Computes the delay for the given retry attempt (0-indexed).
    ///
    /// `initial_delay * backoff_multiplier^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let delay_secs = self.initial_delay.as_secs_f64() * multiplier;
        let capped_secs = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped_secs)
    }

    /// Returns an iterator over all retry delays.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).map(|attempt| self.delay_for_attempt(attempt))
    }

    /// Computes the total maximum wait time for all retries.
    pub fn total_max_wait(&self) -> Duration {
        self.delays().sum()
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Whether a call may be retried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Retry server errors with exponential backoff.
    #[default]
    RetryTransient,

    /// Single attempt. Required for mutating calls.
    NoRetry,
}

/// Result of a retried operation.
#[derive(Debug)]
pub enum RetryResult<T> {
    /// The operation succeeded.
    Success(T),

    /// A server error persisted through every allowed attempt.
    ExhaustedRetries {
        last_error: ApiError,
        /// Attempts made, including the first.
        attempts: u32,
    },

    /// An error that is never retried (not found, auth, rule violation).
    NotRetriable(ApiError),
}

impl<T> RetryResult<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            RetryResult::Success(v) => Ok(v),
            RetryResult::ExhaustedRetries { last_error, .. } => Err(last_error),
            RetryResult::NotRetriable(e) => Err(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RetryResult::Success(_))
    }
}

/// Executes an async operation with retry logic.
///
/// `operation` is called again after a backoff delay whenever it returns a
/// server error, until it succeeds, returns a non-retriable error, or the
/// configured attempts are used up.
pub async fn retry_with_backoff<T, F, Fut>(
    config: RetryConfig,
    policy: RetryPolicy,
    mut operation: F,
) -> RetryResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    let max_attempts = if policy == RetryPolicy::NoRetry {
        1
    } else {
        config.max_retries + 1
    };

    loop {
        match operation().await {
            Ok(value) => return RetryResult::Success(value),
            Err(e) => {
                attempt += 1;

                match e.kind {
                    ApiErrorKind::NotFound
                    | ApiErrorKind::Unauthenticated
                    | ApiErrorKind::RuleViolation => return RetryResult::NotRetriable(e),
                    ApiErrorKind::Server => {
                        if attempt >= max_attempts {
                            return RetryResult::ExhaustedRetries {
                                last_error: e,
                                attempts: attempt,
                            };
                        }

                        let delay = config.delay_for_attempt(attempt - 1);
                        tracing::debug!(attempt, ?delay, error = %e, "retrying admin API call");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    // ─── Unit Tests ───────────────────────────────────────────────────────────

    #[test]
    fn default_delays_are_half_then_one_second() {
        let delays: Vec<_> = RetryConfig::DEFAULT.delays().collect();
        assert_eq!(
            delays,
            vec![Duration::from_millis(500), Duration::from_secs(1)]
        );
        assert_eq!(
            RetryConfig::DEFAULT.total_max_wait(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn none_has_no_delays() {
        assert_eq!(RetryConfig::NONE.delays().count(), 0);
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(
            RetryConfig::DEFAULT,
            RetryPolicy::RetryTransient,
            move || {
                counter_clone.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, ApiError>(42) }
            },
        )
        .await;

        assert!(result.is_success());
        assert_eq!(result.into_result().unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(
            RetryConfig::DEFAULT,
            RetryPolicy::RetryTransient,
            move || {
                counter_clone.fetch_add(1, Ordering::SeqCst);
                async { Err::<i32, _>(ApiError::not_found("Not Found")) }
            },
        )
        .await;

        assert!(matches!(result, RetryResult::NotRetriable(_)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unauthenticated_is_not_retried() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(
            RetryConfig::DEFAULT,
            RetryPolicy::RetryTransient,
            move || {
                counter_clone.fetch_add(1, Ordering::SeqCst);
                async { Err::<i32, _>(ApiError::unauthenticated("Please login")) }
            },
        )
        .await;

        assert!(matches!(result, RetryResult::NotRetriable(_)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_error_succeeds_on_third_attempt() {
        let config = RetryConfig::new(3, Duration::from_millis(1), Duration::from_millis(10), 2.0);

        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(config, RetryPolicy::RetryTransient, move || {
            let count = counter_clone.fetch_add(1, Ordering::SeqCst);
            async move {
                if count < 2 {
                    Err(ApiError::server("temporary failure"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert!(result.is_success());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn server_error_exhausts_retries() {
        let config = RetryConfig::new(2, Duration::from_millis(1), Duration::from_millis(10), 2.0);

        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(config, RetryPolicy::RetryTransient, move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            async { Err::<i32, _>(ApiError::server("always fails")) }
        })
        .await;

        match result {
            RetryResult::ExhaustedRetries { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("Expected ExhaustedRetries, got {:?}", other),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn no_retry_policy_makes_one_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(RetryConfig::DEFAULT, RetryPolicy::NoRetry, move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            async { Err::<i32, _>(ApiError::server("error")) }
        })
        .await;

        assert!(matches!(result, RetryResult::ExhaustedRetries { attempts: 1, .. }));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    // ─── Property Tests ───────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn delay_never_exceeds_cap(
            initial_ms in 1u64..1000,
            max_ms in 1000u64..60000,
            multiplier in 1.5f64..3.0,
            attempt in 0u32..10,
        ) {
            let config = RetryConfig::new(
                10,
                Duration::from_millis(initial_ms),
                Duration::from_millis(max_ms),
                multiplier,
            );
            prop_assert!(config.delay_for_attempt(attempt) <= Duration::from_millis(max_ms));
        }

        #[test]
        fn delay_sequence_is_monotonic(
            initial_ms in 1u64..1000,
            max_ms in 1000u64..60000,
            multiplier in 1.5f64..3.0,
            max_retries in 1u32..15,
        ) {
            let config = RetryConfig::new(
                max_retries,
                Duration::from_millis(initial_ms),
                Duration::from_millis(max_ms),
                multiplier,
            );
            let delays: Vec<_> = config.delays().collect();
            for window in delays.windows(2) {
                prop_assert!(window[1] >= window[0]);
            }
        }
    }
}
