//! Hunt orchestrator.
//!
//! This module provides the [`Hunter`], which runs one identity through
//! search, extraction, scoring and summarization. Every remote stage is
//! paced by the shared [`RateLimiter`] and wrapped in the [`RetryExecutor`].

use crate::analyzer::{ProfileAnalyzer, ANALYSIS_DISABLED, ANALYSIS_UNAVAILABLE};
use crate::confidence::ConfidenceCalculator;
use crate::error::Result;
use crate::finder::ProfileFinder;
use crate::guard::BlockGuard;
use crate::profile_scraper::ProfileScraper;
use crate::rate_limit::RateLimiter;
use crate::report::{HuntReport, HuntResult};
use crate::retry::RetryExecutor;
use hunter_browser::PageFetcher;
use hunter_core::{AppConfig, Candidate, ExtractedProfile, HuntId, IdentityQuery, Timestamp};
use hunter_llm::LlmProvider;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

/// Progress of a single hunt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntStage {
    /// Looking for a candidate URL
    Searching,
    /// Fetching and parsing the candidate profile
    Extracting,
    /// Computing the confidence score
    Scoring,
    /// Generating the career summary
    Summarizing,
    /// Finished, with or without a profile
    Done,
}

impl fmt::Display for HuntStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Searching => "searching",
            Self::Extracting => "extracting",
            Self::Scoring => "scoring",
            Self::Summarizing => "summarizing",
            Self::Done => "done",
        })
    }
}

/// Runs hunts against one fetch collaborator.
pub struct Hunter {
    /// Page fetcher shared with the finder and scraper
    fetcher: Arc<dyn PageFetcher>,
    finder: ProfileFinder,
    scraper: ProfileScraper,
    calculator: ConfidenceCalculator,
    analyzer: ProfileAnalyzer,
    /// Pacing shared by every hunt using this limiter
    rate_limiter: Arc<RateLimiter>,
    retry: RetryExecutor,
}

impl Hunter {
    /// Wire a hunter from configuration.
    ///
    /// `provider` is the summarizer; `None` disables the analysis stage.
    pub fn from_config(
        config: &AppConfig,
        fetcher: Arc<dyn PageFetcher>,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Result<Self> {
        let guard = Arc::new(BlockGuard::from_config(config));
        let finder = ProfileFinder::from_config(config, fetcher.clone(), guard.clone())?;
        let scraper = ProfileScraper::from_config(config, fetcher.clone(), guard)?;

        Ok(Self {
            fetcher,
            finder,
            scraper,
            calculator: ConfidenceCalculator::new(),
            analyzer: ProfileAnalyzer::from_config(&config.llm, provider),
            rate_limiter: Arc::new(RateLimiter::from_config(&config.rate_limit)?),
            retry: RetryExecutor::from_config(&config.retry),
        })
    }

    /// Share `limiter` with other hunters running concurrently.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = limiter;
        self
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryExecutor) -> Self {
        self.retry = retry;
        self
    }

    /// The limiter pacing this hunter.
    #[must_use]
    pub fn rate_limiter(&self) -> Arc<RateLimiter> {
        self.rate_limiter.clone()
    }

    /// Run one hunt and return the flat result.
    pub async fn hunt(&self, query: &IdentityQuery) -> Result<HuntResult> {
        Ok(self.hunt_detailed(query).await?.result)
    }

    /// Run one hunt and return the report with intermediate data.
    pub async fn hunt_detailed(&self, query: &IdentityQuery) -> Result<HuntReport> {
        let hunt_id = HuntId::generate();
        let span = tracing::info_span!("hunt", hunt_id = %hunt_id);
        self.run(hunt_id, query).instrument(span).await
    }

    /// Release the fetch collaborator.
    pub async fn close(&self) -> Result<()> {
        self.fetcher.close().await?;
        Ok(())
    }

    /// Run one hunt, then close the fetcher whatever the outcome.
    pub async fn hunt_and_close(&self, query: &IdentityQuery) -> Result<HuntResult> {
        let outcome = self.hunt(query).await;
        self.close_after(outcome).await
    }

    /// Like [`Hunter::hunt_and_close`], returning the full report.
    pub async fn hunt_detailed_and_close(&self, query: &IdentityQuery) -> Result<HuntReport> {
        let outcome = self.hunt_detailed(query).await;
        self.close_after(outcome).await
    }

    /// A hunt error wins over a close error, which is then only logged.
    async fn close_after<T>(&self, outcome: Result<T>) -> Result<T> {
        let closed = self.close().await;

        match (outcome, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    tracing::warn!(error = %close_err, "Failed to close browser after hunt error");
                }
                Err(e)
            }
        }
    }

    async fn run(&self, hunt_id: HuntId, query: &IdentityQuery) -> Result<HuntReport> {
        let started_at = Timestamp::now();
        tracing::info!(
            name = query.name(),
            company = query.company(),
            stage = %HuntStage::Searching,
            "Starting hunt"
        );

        let candidate = self.search(query).await?;
        if !candidate.is_found() {
            let report = HuntReport {
                hunt_id,
                query: query.clone(),
                candidate,
                profile: None,
                confidence: 0.0,
                started_at,
                completed_at: Timestamp::now(),
                result: HuntResult::not_found(query),
            };
            tracing::info!(
                stage = %HuntStage::Done,
                duration_ms = report.duration_ms(),
                "No profile found"
            );
            return Ok(report);
        }

        tracing::info!(stage = %HuntStage::Extracting, url = %candidate.url, "Hunt stage");
        let profile = self.extract(&candidate).await?;

        tracing::info!(stage = %HuntStage::Scoring, "Hunt stage");
        let confidence = self.calculator.score(query, &profile);

        tracing::info!(stage = %HuntStage::Summarizing, "Hunt stage");
        let analysis = self.summarize(&profile).await;

        let result = HuntResult::found(query, &candidate, &profile, confidence, analysis);
        let report = HuntReport {
            hunt_id,
            query: query.clone(),
            candidate,
            profile: Some(profile),
            confidence,
            started_at,
            completed_at: Timestamp::now(),
            result,
        };
        tracing::info!(
            stage = %HuntStage::Done,
            url = %report.candidate.url,
            confidence = %report.result.confidence,
            duration_ms = report.duration_ms(),
            "Hunt complete"
        );

        Ok(report)
    }

    async fn search(&self, query: &IdentityQuery) -> Result<Candidate> {
        self.rate_limiter.wait().await;
        self.retry
            .execute("find profile", || self.finder.find(query))
            .await
    }

    async fn extract(&self, candidate: &Candidate) -> Result<ExtractedProfile> {
        self.rate_limiter.wait().await;
        self.retry
            .execute("scrape profile", || self.scraper.scrape(&candidate.url))
            .await
    }

    /// Never fails: exhausted retries yield the fallback sentence.
    async fn summarize(&self, profile: &ExtractedProfile) -> String {
        if !self.analyzer.is_enabled() {
            return ANALYSIS_DISABLED.to_string();
        }

        self.rate_limiter.wait().await;
        match self
            .retry
            .execute("analyze profile", || self.analyzer.analyze(profile))
            .await
        {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(error = %e, "Profile analysis failed, using fallback");
                ANALYSIS_UNAVAILABLE.to_string()
            }
        }
    }
}

impl fmt::Debug for Hunter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hunter")
            .field("finder", &self.finder)
            .field("scraper", &self.scraper)
            .field("analyzer", &self.analyzer)
            .field("rate_limiter", &self.rate_limiter)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
