//! Fetches a candidate profile page and extracts it.

use crate::error::{HuntError, Result};
use crate::extractor::ProfileExtractor;
use crate::guard::BlockGuard;
use hunter_browser::{FetchOptions, PageFetcher};
use hunter_core::{AppConfig, ConfigError, ExtractedProfile};
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

/// Loads profile pages through the block guard.
pub struct ProfileScraper {
    profile_url: Regex,
    fetcher: Arc<dyn PageFetcher>,
    guard: Arc<BlockGuard>,
    extractor: ProfileExtractor,
    fetch_options: FetchOptions,
    login_before_scrape: bool,
}

impl ProfileScraper {
    /// Create a scraper accepting profile URLs on `profile_domain`.
    pub fn new(
        profile_domain: &str,
        fetcher: Arc<dyn PageFetcher>,
        guard: Arc<BlockGuard>,
    ) -> Result<Self> {
        let pattern = format!(
            r"^https?://(www\.)?{}/in/[\w\-]+/?.*$",
            regex::escape(profile_domain)
        );
        let profile_url = Regex::new(&pattern)
            .map_err(|e| ConfigError::invalid("search.profile_domain", e.to_string()))?;

        Ok(Self {
            profile_url,
            fetcher,
            guard,
            extractor: ProfileExtractor::new(),
            fetch_options: FetchOptions::default(),
            login_before_scrape: false,
        })
    }

    /// Build a scraper from the `[search]` and `[browser]` sections.
    pub fn from_config(
        config: &AppConfig,
        fetcher: Arc<dyn PageFetcher>,
        guard: Arc<BlockGuard>,
    ) -> Result<Self> {
        let mut options = FetchOptions::default();
        if !config.browser.wait_for_selector.is_empty() {
            options.wait_for_selector = Some(config.browser.wait_for_selector.clone());
        }
        options.timeout = Some(Duration::from_secs(config.browser.navigation_timeout_secs));

        Ok(Self::new(&config.search.profile_domain, fetcher, guard)?
            .with_fetch_options(options)
            .with_login_before_scrape(config.browser.login_before_scrape))
    }

    /// Options used for every profile fetch.
    #[must_use]
    pub fn with_fetch_options(mut self, options: FetchOptions) -> Self {
        self.fetch_options = options;
        self
    }

    /// Require a logged-in session before each profile fetch.
    #[must_use]
    pub fn with_login_before_scrape(mut self, enabled: bool) -> Self {
        self.login_before_scrape = enabled;
        self
    }

    /// Whether `url` looks like a profile page on the configured domain.
    #[must_use]
    pub fn is_profile_url(&self, url: &str) -> bool {
        self.profile_url.is_match(url)
    }

    /// Fetch `url` and extract the profile on it.
    pub async fn scrape(&self, url: &str) -> Result<ExtractedProfile> {
        if !self.is_profile_url(url) {
            return Err(HuntError::InvalidProfileUrl(url.to_string()));
        }

        if self.login_before_scrape && !self.fetcher.reauthenticate(false).await? {
            return Err(HuntError::Authentication(
                "could not establish a logged-in session".to_string(),
            ));
        }

        tracing::debug!(url, "Fetching profile page");
        let page = self.fetcher.fetch(url, &self.fetch_options).await?;
        self.guard.inspect(self.fetcher.as_ref(), &page).await?;

        let profile = self.extractor.extract(&page);
        tracing::info!(
            url = %profile.url,
            name = %profile.full_name,
            positions = profile.experience.len(),
            "Extracted profile"
        );
        Ok(profile)
    }
}

impl std::fmt::Debug for ProfileScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileScraper")
            .field("profile_url", &self.profile_url.as_str())
            .field("fetch_options", &self.fetch_options)
            .field("login_before_scrape", &self.login_before_scrape)
            .finish_non_exhaustive()
    }
}
