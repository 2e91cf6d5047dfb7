//! Applies the recommended recovery action for a fetched page.

use crate::block::{BlockDetectionResult, BlockDetector, RecommendedAction, RecoveryAction};
use crate::error::{HuntError, Result};
use hunter_browser::{FetchResult, PageFetcher};
use hunter_core::AppConfig;
use std::time::Duration;

/// Runs block detection on fetched pages and performs the recovery step.
///
/// Recoverable blocks are reported as retryable [`HuntError::Blocked`]
/// errors after the recovery step, so the surrounding retry loop fetches
/// the page again.
#[derive(Debug, Clone)]
pub struct BlockGuard {
    detector: BlockDetector,
    max_block_wait: Option<Duration>,
    change_proxy_wait_cap: Duration,
}

impl BlockGuard {
    /// Create a guard with no cap on announced waits.
    #[must_use]
    pub fn new(detector: BlockDetector) -> Self {
        Self {
            detector,
            max_block_wait: None,
            change_proxy_wait_cap: Duration::from_secs(30),
        }
    }

    /// Build a guard from the `[search]` and `[recovery]` sections.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let mut guard = Self::new(BlockDetector::new(&config.search.profile_domain))
            .with_change_proxy_wait_cap(Duration::from_secs(
                config.recovery.change_proxy_wait_cap_secs,
            ));
        if let Some(secs) = config.recovery.max_block_wait_secs {
            guard = guard.with_max_block_wait(Duration::from_secs(secs));
        }
        guard
    }

    /// Never sleep longer than `max` for a single block.
    #[must_use]
    pub fn with_max_block_wait(mut self, max: Duration) -> Self {
        self.max_block_wait = Some(max);
        self
    }

    /// Upper bound of the pause after switching proxy.
    #[must_use]
    pub fn with_change_proxy_wait_cap(mut self, cap: Duration) -> Self {
        self.change_proxy_wait_cap = cap;
        self
    }

    /// The detector used for classification.
    #[must_use]
    pub fn detector(&self) -> &BlockDetector {
        &self.detector
    }

    /// Inspect `page` and act on any block found.
    ///
    /// Returns the detection result when the page is usable.
    pub async fn inspect(
        &self,
        fetcher: &dyn PageFetcher,
        page: &FetchResult,
    ) -> Result<BlockDetectionResult> {
        let detection = self.detector.detect(&page.html, &page.url);
        let recommended = BlockDetector::recommended_action(&detection);

        match recommended.action {
            RecoveryAction::Continue => Ok(detection),
            RecoveryAction::Stop | RecoveryAction::ManualIntervention => {
                tracing::error!(
                    url = %page.url,
                    action = %recommended.action,
                    reason = ?recommended.reason,
                    "{}",
                    recommended.message
                );
                Err(Self::blocked(recommended))
            }
            RecoveryAction::Wait => {
                let wait = self.capped(recommended.wait);
                tracing::warn!(
                    url = %page.url,
                    reason = ?recommended.reason,
                    wait_secs = wait.as_secs(),
                    "Page blocked, backing off"
                );
                tokio::time::sleep(wait).await;
                Err(Self::blocked(recommended))
            }
            RecoveryAction::ChangeProxy => {
                let identity = fetcher.rotate_identity().await?;
                let wait = self.capped(recommended.wait.min(self.change_proxy_wait_cap));
                tracing::warn!(
                    url = %page.url,
                    proxy = identity.proxy.as_deref().unwrap_or("direct"),
                    wait_secs = wait.as_secs(),
                    "Address blocked, rotated browser identity"
                );
                tokio::time::sleep(wait).await;
                Err(Self::blocked(recommended))
            }
            RecoveryAction::Login => {
                tracing::warn!(url = %page.url, "Sign-in wall detected, re-authenticating");
                if fetcher.reauthenticate(true).await? {
                    Err(Self::blocked(recommended))
                } else {
                    Err(HuntError::Authentication(
                        "login required and re-authentication failed".to_string(),
                    ))
                }
            }
            RecoveryAction::Skip => {
                let kind = recommended
                    .reason
                    .unwrap_or(crate::block::BlockKind::NotFound);
                tracing::info!(url = %page.url, %kind, "Profile unavailable, skipping");
                Err(HuntError::ProfileUnavailable { kind })
            }
        }
    }

    fn capped(&self, wait: Duration) -> Duration {
        self.max_block_wait.map_or(wait, |max| wait.min(max))
    }

    fn blocked(recommended: RecommendedAction) -> HuntError {
        HuntError::Blocked {
            kind: recommended.reason,
            action: recommended.action,
            message: recommended.message,
        }
    }
}
