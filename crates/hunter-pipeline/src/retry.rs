//! Retry with exponential backoff for fallible async actions.

use hunter_browser::BrowserError;
use hunter_core::RetryConfig;
use hunter_llm::LlmError;
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::error::HuntError;

/// Errors that know whether repeating the action may help.
pub trait Retryable {
    /// Whether the failed action should be attempted again.
    fn is_retryable(&self) -> bool;
}

impl Retryable for HuntError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Blocked { action, .. } => !action.is_fatal(),
            Self::Scraping(_) => true,
            Self::Browser(e) => e.is_transient(),
            Self::Llm(e) => e.is_transient(),
            Self::Authentication(_)
            | Self::ProfileUnavailable { .. }
            | Self::InvalidProfileUrl(_)
            | Self::Config(_) => false,
        }
    }
}

impl Retryable for BrowserError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

impl Retryable for LlmError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

/// Runs an action up to `max_retries + 1` times with jittered exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    max_retries: u32,
    initial_delay: Duration,
    backoff_factor: f64,
}

impl RetryExecutor {
    /// Create an executor.
    #[must_use]
    pub fn new(max_retries: u32, initial_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_retries,
            initial_delay,
            backoff_factor,
        }
    }

    /// Build an executor from the `[retry]` configuration section.
    #[must_use]
    pub fn from_config(config: &RetryConfig) -> Self {
        let initial_delay =
            Duration::try_from_secs_f64(config.retry_delay_secs).unwrap_or(Duration::ZERO);
        Self::new(config.max_retries, initial_delay, config.backoff_factor)
    }

    /// Run `action`, retrying failures the error type reports as retryable.
    pub async fn execute<T, E, F, Fut>(&self, operation: &str, action: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        self.execute_if(operation, action, E::is_retryable).await
    }

    /// Run `action`, retrying failures for which `should_retry` returns true.
    ///
    /// After the last attempt the final error is returned unchanged.
    pub async fn execute_if<T, E, F, Fut, P>(
        &self,
        operation: &str,
        mut action: F,
        should_retry: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let total_attempts = self.max_retries.saturating_add(1);
        let mut delay = self.initial_delay;
        let mut attempt = 1;

        loop {
            let error = match action().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !should_retry(&error) {
                return Err(error);
            }
            if attempt >= total_attempts {
                tracing::warn!(operation, total_attempts, error = %error, "All attempts failed");
                return Err(error);
            }

            let wait = Self::scaled(delay, rand::thread_rng().gen_range(0.8..=1.2));
            tracing::warn!(
                operation,
                attempt,
                total_attempts,
                retry_in_ms = wait.as_millis(),
                error = %error,
                "Attempt failed, retrying"
            );
            tokio::time::sleep(wait).await;

            delay = Self::scaled(delay, self.backoff_factor);
            attempt += 1;
        }
    }

    fn scaled(delay: Duration, factor: f64) -> Duration {
        Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(Duration::MAX)
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[derive(Debug)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{self:?}")
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_two_failures() {
        let executor = RetryExecutor::new(3, Duration::from_secs(5), 2.0);
        let calls = &AtomicU32::new(0);

        let result = executor
            .execute("flaky", move || async move {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if call < 3 {
                    Err(TestError::Transient)
                } else {
                    Ok(call)
                }
            })
            .await;

        assert_eq!(result.expect("third call succeeds"), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error() {
        let executor = RetryExecutor::new(2, Duration::from_millis(10), 2.0);
        let calls = &AtomicU32::new(0);

        let result: Result<(), TestError> = executor
            .execute("always-failing", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TestError::Transient)
            })
            .await;

        assert!(matches!(result, Err(TestError::Transient)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let executor = RetryExecutor::new(3, Duration::from_secs(1), 2.0);
        let calls = &AtomicU32::new(0);

        let result: Result<(), TestError> = executor
            .execute("permanent", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TestError::Permanent)
            })
            .await;

        assert!(matches!(result, Err(TestError::Permanent)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_grows_by_factor() {
        let executor = RetryExecutor::new(2, Duration::from_secs(1), 2.0);
        let start = Instant::now();

        let _: Result<(), TestError> = executor
            .execute("backoff", || async { Err(TestError::Transient) })
            .await;

        // 1s then 2s, each scaled by a factor in [0.8, 1.2]
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(2400));
        assert!(elapsed <= Duration::from_millis(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_if_uses_predicate() {
        let executor = RetryExecutor::new(3, Duration::from_millis(1), 1.0);
        let calls = &AtomicU32::new(0);

        let result: Result<(), TestError> = executor
            .execute_if(
                "predicate",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Permanent)
                },
                |_| true,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_hunt_error_retryability() {
        use crate::block::RecoveryAction;

        let wait = HuntError::Blocked {
            kind: None,
            action: RecoveryAction::Wait,
            message: String::new(),
        };
        let stop = HuntError::Blocked {
            kind: None,
            action: RecoveryAction::Stop,
            message: String::new(),
        };
        assert!(wait.is_retryable());
        assert!(!stop.is_retryable());
        assert!(HuntError::Browser(BrowserError::Timeout("slow".into())).is_retryable());
        assert!(!HuntError::Browser(BrowserError::MissingCredentials).is_retryable());
        assert!(!HuntError::InvalidProfileUrl("x".into()).is_retryable());
        assert!(HuntError::Scraping("partial page".into()).is_retryable());
    }
}
