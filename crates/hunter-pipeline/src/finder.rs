//! Locates the candidate profile URL for an identity.
//!
//! Search strategies scrape a results page for profile links. The direct
//! strategy guesses vanity URLs and keeps the first one whose page carries
//! the queried name.

use crate::error::Result;
use crate::guard::BlockGuard;
use hunter_browser::{FetchOptions, PageFetcher};
use hunter_core::{AppConfig, Candidate, ConfigError, IdentityQuery, SearchStrategy};
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search?q=";
const BING_SEARCH_URL: &str = "https://www.bing.com/search?q=";

const FIRST_QUERY_CONFIDENCE: f64 = 0.8;
const TIGHTENED_QUERY_CONFIDENCE: f64 = 0.6;
const DIRECT_CONFIDENCE: f64 = 0.5;

/// Finds a profile URL for an [`IdentityQuery`].
pub struct ProfileFinder {
    strategy: SearchStrategy,
    profile_domain: String,
    profile_url: Regex,
    fetcher: Arc<dyn PageFetcher>,
    guard: Arc<BlockGuard>,
}

impl ProfileFinder {
    /// Create a finder for profiles hosted on `profile_domain`.
    pub fn new(
        strategy: SearchStrategy,
        profile_domain: impl Into<String>,
        fetcher: Arc<dyn PageFetcher>,
        guard: Arc<BlockGuard>,
    ) -> Result<Self> {
        let profile_domain = profile_domain.into();
        let pattern = format!(
            r#"https?://(?:www\.)?{}/in/[\w\-]+/?[^"'\s]*"#,
            regex::escape(&profile_domain)
        );
        let profile_url = Regex::new(&pattern)
            .map_err(|e| ConfigError::invalid("search.profile_domain", e.to_string()))?;

        Ok(Self {
            strategy,
            profile_domain,
            profile_url,
            fetcher,
            guard,
        })
    }

    /// Build a finder from the `[search]` section.
    pub fn from_config(
        config: &AppConfig,
        fetcher: Arc<dyn PageFetcher>,
        guard: Arc<BlockGuard>,
    ) -> Result<Self> {
        Self::new(
            config.search.strategy()?,
            config.search.profile_domain.clone(),
            fetcher,
            guard,
        )
    }

    /// The strategy fixed at construction.
    #[must_use]
    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Find the best candidate URL, or [`Candidate::not_found`].
    pub async fn find(&self, query: &IdentityQuery) -> Result<Candidate> {
        let candidate = match self.strategy {
            SearchStrategy::Google => self.search(GOOGLE_SEARCH_URL, query).await?,
            SearchStrategy::Bing => self.search(BING_SEARCH_URL, query).await?,
            SearchStrategy::Direct => self.direct(query).await?,
        };

        if candidate.is_found() {
            tracing::info!(
                strategy = %self.strategy,
                url = %candidate.url,
                confidence = candidate.strategy_confidence,
                "Found candidate profile"
            );
        } else {
            tracing::info!(strategy = %self.strategy, "No candidate profile found");
        }
        Ok(candidate)
    }

    /// Profile URLs in `html`, deduplicated in first-seen order.
    #[must_use]
    pub fn extract_profile_urls(&self, html: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.profile_url
            .find_iter(html)
            .map(|m| m.as_str().to_string())
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }

    async fn search(&self, engine: &str, query: &IdentityQuery) -> Result<Candidate> {
        let queries = [
            (
                format!(
                    "{} {} site:{}/in",
                    query.name(),
                    query.company(),
                    self.profile_domain
                ),
                FIRST_QUERY_CONFIDENCE,
            ),
            (
                format!(
                    "{} {} {} site:{}/in",
                    query.name(),
                    query.email_local_part(),
                    query.company(),
                    self.profile_domain
                ),
                TIGHTENED_QUERY_CONFIDENCE,
            ),
        ];

        for (terms, confidence) in queries {
            let terms = terms.split_whitespace().collect::<Vec<_>>().join(" ");
            let url = format!("{engine}{}", urlencoding::encode(&terms));
            tracing::debug!(url = %url, "Searching for profile");

            let page = self.fetcher.fetch(&url, &FetchOptions::default()).await?;
            let urls = self.extract_profile_urls(&page.html);
            if let Some(first) = urls.into_iter().next() {
                return Ok(Candidate::new(first, confidence));
            }
            // A results page with links is never treated as blocked.
            self.guard.inspect(self.fetcher.as_ref(), &page).await?;
        }

        Ok(Candidate::not_found())
    }

    async fn direct(&self, query: &IdentityQuery) -> Result<Candidate> {
        let wanted_name = query.name().to_lowercase();

        for url in self.direct_urls(query) {
            tracing::debug!(url = %url, "Trying direct profile URL");
            match self.try_direct(&url, &wanted_name).await {
                Ok(Some(final_url)) => return Ok(Candidate::new(final_url, DIRECT_CONFIDENCE)),
                Ok(None) => {}
                Err(e) if e.is_fatal_block() => return Err(e),
                Err(e) => tracing::debug!(url = %url, error = %e, "Direct candidate skipped"),
            }
        }

        Ok(Candidate::not_found())
    }

    /// The final URL of the page when it is the wanted profile.
    async fn try_direct(&self, url: &str, wanted_name: &str) -> Result<Option<String>> {
        let page = self.fetcher.fetch(url, &FetchOptions::default()).await?;
        self.guard.inspect(self.fetcher.as_ref(), &page).await?;

        let marker = format!("{}/in/", self.profile_domain);
        let accepted =
            page.title.to_lowercase().contains(wanted_name) && page.url.contains(&marker);
        Ok(accepted.then_some(page.url))
    }

    /// Vanity URL guesses in the order they are tried.
    fn direct_urls(&self, query: &IdentityQuery) -> Vec<String> {
        let base = format!("https://www.{}/in", self.profile_domain);
        let name = query.name().to_lowercase();
        let tokens: Vec<&str> = name.split_whitespace().collect();
        let local_part = query.email_local_part();

        let mut urls = Vec::new();
        if let [first, .., last] = tokens.as_slice() {
            urls.push(format!("{base}/{first}-{last}"));
            if !local_part.is_empty() {
                urls.push(format!("{base}/{local_part}"));
            }
            urls.push(format!("{base}/{first}.{last}"));
        } else if !local_part.is_empty() {
            urls.push(format!("{base}/{local_part}"));
        }
        urls
    }
}

impl std::fmt::Debug for ProfileFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileFinder")
            .field("strategy", &self.strategy)
            .field("profile_domain", &self.profile_domain)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockDetector;
    use async_trait::async_trait;
    use hunter_browser::{BrowserError, FetchResult, IdentityConfig};
    use std::sync::Mutex;

    /// Serves pages by exact URL and records every request.
    #[derive(Default)]
    struct PageMap {
        pages: Vec<(String, FetchResult)>,
        requests: Mutex<Vec<String>>,
    }

    impl PageMap {
        fn with(mut self, url: &str, page: FetchResult) -> Self {
            self.pages.push((url.to_string(), page));
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for PageMap {
        async fn fetch(
            &self,
            url: &str,
            _options: &FetchOptions,
        ) -> hunter_browser::Result<FetchResult> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .iter()
                .find(|(known, _)| known == url)
                .map(|(_, page)| page.clone())
                .ok_or_else(|| BrowserError::NavigationError(format!("no page for {url}")))
        }

        async fn reauthenticate(&self, _force: bool) -> hunter_browser::Result<bool> {
            Ok(false)
        }

        async fn rotate_identity(&self) -> hunter_browser::Result<IdentityConfig> {
            Ok(IdentityConfig {
                user_agent: "test-agent".to_string(),
                proxy: None,
            })
        }

        async fn close(&self) -> hunter_browser::Result<()> {
            Ok(())
        }
    }

    fn finder(strategy: SearchStrategy, fetcher: Arc<PageMap>) -> ProfileFinder {
        let guard = Arc::new(BlockGuard::new(BlockDetector::new("linkedin.com")));
        ProfileFinder::new(strategy, "linkedin.com", fetcher, guard).expect("valid finder")
    }

    fn html(body: &str) -> FetchResult {
        FetchResult {
            html: body.to_string(),
            ..FetchResult::default()
        }
    }

    fn query() -> IdentityQuery {
        IdentityQuery::new("John Smith", "jsmith@example.com", "Example Corp")
    }

    #[test]
    fn test_extract_profile_urls_dedupes_in_order() {
        let finder = finder(SearchStrategy::Google, Arc::new(PageMap::default()));
        let html = r#"
            <a href="https://www.linkedin.com/in/john-smith">John Smith</a>
            <a href="http://linkedin.com/in/jsmith/">J. Smith</a>
            <a href="https://www.linkedin.com/in/john-smith">again</a>
            <a href="https://www.linkedin.com/company/example">company</a>
            <a href="https://www.linkedin.com/in/smith-john-42?trk=x">third</a>
        "#;

        assert_eq!(
            finder.extract_profile_urls(html),
            vec![
                "https://www.linkedin.com/in/john-smith",
                "http://linkedin.com/in/jsmith/",
                "https://www.linkedin.com/in/smith-john-42?trk=x",
            ]
        );
    }

    #[test]
    fn test_domain_is_matched_literally() {
        let finder = finder(SearchStrategy::Google, Arc::new(PageMap::default()));
        assert!(finder
            .extract_profile_urls("https://www.linkedinXcom/in/john")
            .is_empty());
    }

    #[tokio::test]
    async fn test_google_first_query_hit() {
        let first = format!(
            "{GOOGLE_SEARCH_URL}{}",
            urlencoding::encode("John Smith Example Corp site:linkedin.com/in")
        );
        let fetcher = Arc::new(PageMap::default().with(
            &first,
            html(r#"<a href="https://www.linkedin.com/in/john-smith">x</a>"#),
        ));

        let candidate = finder(SearchStrategy::Google, fetcher.clone())
            .find(&query())
            .await
            .expect("search");

        assert_eq!(candidate.url, "https://www.linkedin.com/in/john-smith");
        assert_eq!(candidate.strategy_confidence, 0.8);
        assert_eq!(fetcher.requests(), vec![first]);
    }

    #[tokio::test]
    async fn test_bing_falls_back_to_tightened_query() {
        let first = format!(
            "{BING_SEARCH_URL}{}",
            urlencoding::encode("John Smith Example Corp site:linkedin.com/in")
        );
        let second = format!(
            "{BING_SEARCH_URL}{}",
            urlencoding::encode("John Smith jsmith Example Corp site:linkedin.com/in")
        );
        let fetcher = Arc::new(
            PageMap::default()
                .with(&first, html("<p>No results</p>"))
                .with(
                    &second,
                    html(r#"<a href="https://www.linkedin.com/in/jsmith">x</a>"#),
                ),
        );

        let candidate = finder(SearchStrategy::Bing, fetcher.clone())
            .find(&query())
            .await
            .expect("search");

        assert_eq!(candidate.url, "https://www.linkedin.com/in/jsmith");
        assert_eq!(candidate.strategy_confidence, 0.6);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_search_without_results_is_not_found() {
        let first = format!(
            "{GOOGLE_SEARCH_URL}{}",
            urlencoding::encode("John Smith Example Corp site:linkedin.com/in")
        );
        let second = format!(
            "{GOOGLE_SEARCH_URL}{}",
            urlencoding::encode("John Smith jsmith Example Corp site:linkedin.com/in")
        );
        let fetcher = Arc::new(
            PageMap::default()
                .with(&first, html("<p>nothing</p>"))
                .with(&second, html("<p>nothing</p>")),
        );
        let candidate = finder(SearchStrategy::Google, fetcher)
            .find(&query())
            .await
            .expect("search");
        assert_eq!(candidate, Candidate::not_found());
    }

    #[tokio::test]
    async fn test_direct_tries_urls_in_order() {
        let profile = FetchResult {
            title: "John Smith | LinkedIn".to_string(),
            url: "https://www.linkedin.com/in/jsmith".to_string(),
            ..FetchResult::default()
        };
        let fetcher = Arc::new(
            PageMap::default().with("https://www.linkedin.com/in/jsmith", profile),
        );

        let candidate = finder(SearchStrategy::Direct, fetcher.clone())
            .find(&query())
            .await
            .expect("direct");

        assert_eq!(candidate.url, "https://www.linkedin.com/in/jsmith");
        assert_eq!(candidate.strategy_confidence, 0.5);
        assert_eq!(
            fetcher.requests(),
            vec![
                "https://www.linkedin.com/in/john-smith",
                "https://www.linkedin.com/in/jsmith",
            ]
        );
    }

    #[tokio::test]
    async fn test_direct_rejects_pages_without_the_name() {
        let other = FetchResult {
            title: "Someone Else | LinkedIn".to_string(),
            url: "https://www.linkedin.com/in/john-smith".to_string(),
            ..FetchResult::default()
        };
        let fetcher = Arc::new(
            PageMap::default().with("https://www.linkedin.com/in/john-smith", other),
        );

        let candidate = finder(SearchStrategy::Direct, fetcher.clone())
            .find(&query())
            .await
            .expect("direct");

        assert!(!candidate.is_found());
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_direct_returns_final_url_after_redirect() {
        let profile = FetchResult {
            title: "John Smith | LinkedIn".to_string(),
            url: "https://www.linkedin.com/in/john-smith-4b2a91".to_string(),
            ..FetchResult::default()
        };
        let fetcher = Arc::new(
            PageMap::default().with("https://www.linkedin.com/in/john-smith", profile),
        );

        let candidate = finder(SearchStrategy::Direct, fetcher.clone())
            .find(&query())
            .await
            .expect("direct");

        assert_eq!(candidate.url, "https://www.linkedin.com/in/john-smith-4b2a91");
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_direct_rejects_pages_off_the_profile_path() {
        let feed = FetchResult {
            title: "John Smith | LinkedIn".to_string(),
            url: "https://www.linkedin.com/feed/".to_string(),
            ..FetchResult::default()
        };
        let fetcher = Arc::new(
            PageMap::default().with("https://www.linkedin.com/in/john-smith", feed),
        );

        let candidate = finder(SearchStrategy::Direct, fetcher.clone())
            .find(&query())
            .await
            .expect("direct");

        assert!(!candidate.is_found());
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_direct_skips_login_redirects() {
        let login = FetchResult {
            title: "John Smith | LinkedIn".to_string(),
            url: "https://www.linkedin.com/login?session_redirect=%2Fin%2Fjohn-smith".to_string(),
            ..FetchResult::default()
        };
        let fetcher = Arc::new(
            PageMap::default().with("https://www.linkedin.com/in/john-smith", login),
        );

        let candidate = finder(SearchStrategy::Direct, fetcher.clone())
            .find(&query())
            .await
            .expect("direct");

        assert!(!candidate.is_found());
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_direct_single_token_name_uses_email_only() {
        let fetcher = Arc::new(PageMap::default());
        let query = IdentityQuery::new("Madonna", "madonna@example.com", "");

        let candidate = finder(SearchStrategy::Direct, fetcher.clone())
            .find(&query)
            .await
            .expect("direct");

        assert!(!candidate.is_found());
        assert_eq!(
            fetcher.requests(),
            vec!["https://www.linkedin.com/in/madonna"]
        );
    }

    #[tokio::test]
    async fn test_direct_propagates_fatal_blocks() {
        let restricted = FetchResult {
            html: "Your account has been restricted".to_string(),
            url: "https://www.linkedin.com/in/john-smith".to_string(),
            ..FetchResult::default()
        };
        let fetcher = Arc::new(
            PageMap::default().with("https://www.linkedin.com/in/john-smith", restricted),
        );

        let err = finder(SearchStrategy::Direct, fetcher.clone())
            .find(&query())
            .await
            .unwrap_err();

        assert!(err.is_fatal_block());
        assert_eq!(fetcher.requests().len(), 1);
    }
}
