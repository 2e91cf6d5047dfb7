use crate::error::{BrowserError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-request fetch options
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// CSS selector that must appear before the page is read
    pub wait_for_selector: Option<String>,
    /// Overrides the engine's navigation timeout
    pub timeout: Option<Duration>,
}

impl FetchOptions {
    pub fn wait_for(selector: impl Into<String>) -> Self {
        Self {
            wait_for_selector: Some(selector.into()),
            timeout: None,
        }
    }
}

/// A rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    pub html: String,
    pub markdown: String,
    pub title: String,
    /// Final URL after redirects
    pub url: String,
}

/// The identity presented after a rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityConfig {
    pub user_agent: String,
    pub proxy: Option<String>,
}

/// Page fetching capability used by the hunt pipeline
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Render a URL and return its content
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<FetchResult>;

    /// Make sure a logged-in session exists; `force` skips the session check
    async fn reauthenticate(&self, force: bool) -> Result<bool>;

    /// Switch to a new fingerprint and proxy
    async fn rotate_identity(&self) -> Result<IdentityConfig>;

    /// Release the underlying browser
    async fn close(&self) -> Result<()>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("invalid URL: {e}")))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("no host in URL".to_string()))
        .map(ToString::to_string)
}
