//! Process-wide pacing of remote actions.
//!
//! One [`RateLimiter`] is shared (through an `Arc`) by every stage of a hunt
//! and by concurrent hunts, so searches, profile fetches and summaries all
//! draw from the same budget.

use crate::error::Result;
use hunter_core::{ConfigError, RateLimitConfig};
use rand::Rng;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Minimum interval between actions plus a random jitter.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    jitter_min_ms: u64,
    jitter_max_ms: u64,
    /// Completion time of the previous `wait`. The lock is held across the
    /// pacing sleep so callers are released in arrival order.
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_minute` actions.
    ///
    /// # Errors
    /// Returns a configuration error when `requests_per_minute` is zero or the
    /// jitter bounds are inverted.
    pub fn new(requests_per_minute: u32, jitter_min_ms: u64, jitter_max_ms: u64) -> Result<Self> {
        if requests_per_minute == 0 {
            return Err(ConfigError::invalid(
                "rate_limit.requests_per_minute",
                "must be greater than zero",
            )
            .into());
        }
        if jitter_min_ms > jitter_max_ms {
            return Err(ConfigError::invalid(
                "rate_limit.jitter_min_ms",
                format!("{jitter_min_ms} is greater than jitter_max_ms {jitter_max_ms}"),
            )
            .into());
        }

        Ok(Self {
            interval: Duration::from_secs(60) / requests_per_minute,
            jitter_min_ms,
            jitter_max_ms,
            last_request: Mutex::new(None),
        })
    }

    /// Build a limiter from the `[rate_limit]` configuration section.
    pub fn from_config(config: &RateLimitConfig) -> Result<Self> {
        Self::new(
            config.requests_per_minute,
            config.jitter_min_ms,
            config.jitter_max_ms,
        )
    }

    /// Minimum spacing between two completed waits.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Suspend until the next action may run.
    pub async fn wait(&self) {
        let mut last_request = self.last_request.lock().await;

        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                let remaining = self.interval - elapsed;
                tracing::debug!(wait_ms = remaining.as_millis(), "Rate limiter pacing");
                sleep(remaining).await;
            }
        }

        sleep(self.jitter()).await;
        *last_request = Some(Instant::now());
    }

    fn jitter(&self) -> Duration {
        let millis = rand::thread_rng().gen_range(self.jitter_min_ms..=self.jitter_max_ms);
        Duration::from_millis(millis)
    }
}
