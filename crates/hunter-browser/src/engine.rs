use crate::error::{BrowserError, Result};
use crate::fetcher::{extract_domain, FetchOptions, FetchResult, IdentityConfig, PageFetcher};
use crate::fingerprint::FingerprintConfig;
use crate::markdown::html_to_markdown;
use crate::proxy::{ProxyEndpoint, ProxyPool};
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use hunter_core::{AppConfig, BrowserConfig, CredentialsConfig};
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

fn chromium(e: impl Display) -> BrowserError {
    BrowserError::ChromiumError(e.to_string())
}

fn navigation(e: impl Display) -> BrowserError {
    BrowserError::NavigationError(e.to_string())
}

/// A running Chromium process and its CDP event loop
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

struct EngineState {
    session: Option<BrowserSession>,
    fingerprint: FingerprintConfig,
    proxies: Option<ProxyPool>,
    current_proxy: Option<ProxyEndpoint>,
}

/// Browser automation engine
///
/// Chromium is launched lazily on first use and relaunched after an identity
/// rotation. Page operations are serialized through one session.
pub struct BrowserEngine {
    settings: BrowserConfig,
    credentials: CredentialsConfig,
    profile_domain: String,
    state: Mutex<EngineState>,
}

impl BrowserEngine {
    /// Create an engine; no browser is started until the first fetch
    pub fn new(
        settings: BrowserConfig,
        credentials: CredentialsConfig,
        profile_domain: impl Into<String>,
    ) -> Result<Self> {
        let mut proxies = match &settings.proxies_file {
            Some(path) => Some(ProxyPool::load(path, settings.max_proxy_failures)?),
            None => None,
        };
        let current_proxy = proxies.as_mut().and_then(ProxyPool::next);

        let fingerprint = if settings.rotate_user_agent {
            FingerprintConfig::randomized()
        } else {
            FingerprintConfig::fixed(settings.window_width, settings.window_height)
        };

        Ok(Self {
            settings,
            credentials,
            profile_domain: profile_domain.into(),
            state: Mutex::new(EngineState {
                session: None,
                fingerprint,
                proxies,
                current_proxy,
            }),
        })
    }

    /// Create an engine from the application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.browser.clone(),
            config.credentials.clone(),
            config.search.profile_domain.clone(),
        )
    }

    fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.navigation_timeout_secs.max(1))
    }

    fn site_url(&self, path: &str) -> String {
        format!("https://www.{}/{}", self.profile_domain, path)
    }

    fn launch_config(
        &self,
        fingerprint: &FingerprintConfig,
        proxy: Option<&ProxyEndpoint>,
    ) -> Result<LaunchConfig> {
        let mut builder = LaunchConfig::builder()
            .no_sandbox()
            .window_size(fingerprint.viewport_width, fingerprint.viewport_height)
            .request_timeout(self.navigation_timeout())
            .arg(format!("--user-agent={}", fingerprint.user_agent));

        if !self.settings.headless {
            builder = builder.with_head();
        }
        if let Some(proxy) = proxy {
            builder = builder.arg(format!("--proxy-server={}", proxy.server()));
        }

        builder.build().map_err(BrowserError::ChromiumError)
    }

    async fn session<'a>(&self, state: &'a mut EngineState) -> Result<&'a Browser> {
        if state.session.is_none() {
            let config = self.launch_config(&state.fingerprint, state.current_proxy.as_ref())?;
            let (browser, mut handler) = Browser::launch(config).await.map_err(chromium)?;

            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(e) = event {
                        tracing::debug!("Browser handler error: {}", e);
                    }
                }
            });

            tracing::info!(
                headless = self.settings.headless,
                proxy = ?state.current_proxy.as_ref().map(ProxyEndpoint::server),
                "Launched browser"
            );
            state.session = Some(BrowserSession { browser, handler });
        }

        state
            .session
            .as_ref()
            .map(|session| &session.browser)
            .ok_or_else(|| chromium("browser session unavailable"))
    }

    async fn shutdown(mut session: BrowserSession) {
        if let Err(e) = session.browser.close().await {
            tracing::debug!("Browser close failed: {}", e);
        }
        if let Err(e) = session.browser.wait().await {
            tracing::debug!("Waiting for browser exit failed: {}", e);
        }
        session.handler.abort();
    }

    async fn load_page(
        &self,
        browser: &Browser,
        url: &str,
        options: &FetchOptions,
    ) -> Result<FetchResult> {
        let timeout = options.timeout.unwrap_or_else(|| self.navigation_timeout());

        let page = tokio::time::timeout(timeout, browser.new_page(url))
            .await
            .map_err(|_| BrowserError::Timeout(format!("opening {url} exceeded {timeout:?}")))?
            .map_err(navigation)?;

        let outcome = Self::read_page(&page, url, options, timeout).await;

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close page: {}", e);
        }
        outcome
    }

    async fn read_page(
        page: &Page,
        url: &str,
        options: &FetchOptions,
        timeout: Duration,
    ) -> Result<FetchResult> {
        tokio::time::timeout(timeout, page.wait_for_navigation())
            .await
            .map_err(|_| BrowserError::Timeout(format!("navigation to {url} exceeded {timeout:?}")))?
            .map_err(navigation)?;

        if let Some(selector) = options
            .wait_for_selector
            .as_deref()
            .filter(|s| !s.is_empty())
        {
            Self::wait_for_selector(page, selector, timeout).await?;
        }

        let html = page.content().await.map_err(chromium)?;
        let title = page.get_title().await.map_err(chromium)?.unwrap_or_default();
        let final_url = page
            .url()
            .await
            .map_err(chromium)?
            .unwrap_or_else(|| url.to_string());
        let markdown = html_to_markdown(&html);

        Ok(FetchResult {
            html,
            markdown,
            title,
            url: final_url,
        })
    }

    async fn wait_for_selector(page: &Page, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(BrowserError::SelectorNotFound(selector.to_string()));
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn session_is_active(&self, browser: &Browser) -> bool {
        match self
            .load_page(browser, &self.site_url("feed/"), &FetchOptions::default())
            .await
        {
            Ok(page) => page.url.contains("/feed"),
            Err(e) => {
                tracing::debug!("Session check failed: {}", e);
                false
            }
        }
    }

    async fn log_in(&self, browser: &Browser, email: &str, password: &str) -> Result<bool> {
        let timeout = self.navigation_timeout();
        let page = browser
            .new_page(self.site_url("login"))
            .await
            .map_err(navigation)?;

        let outcome: Result<bool> = async {
            page.wait_for_navigation().await.map_err(navigation)?;

            let username = page
                .find_element("input#username")
                .await
                .map_err(|_| BrowserError::SelectorNotFound("input#username".to_string()))?;
            username.click().await.map_err(chromium)?;
            username.type_str(email).await.map_err(chromium)?;

            let secret = page
                .find_element("input#password")
                .await
                .map_err(|_| BrowserError::SelectorNotFound("input#password".to_string()))?;
            secret.click().await.map_err(chromium)?;
            secret.type_str(password).await.map_err(chromium)?;

            page.find_element("button[type=\"submit\"]")
                .await
                .map_err(|_| BrowserError::SelectorNotFound("button[type=\"submit\"]".to_string()))?
                .click()
                .await
                .map_err(chromium)?;

            tokio::time::timeout(timeout, page.wait_for_navigation())
                .await
                .map_err(|_| BrowserError::Timeout(format!("login exceeded {timeout:?}")))?
                .map_err(navigation)?;

            let landed = page.url().await.map_err(chromium)?.unwrap_or_default();
            Ok(landed.contains("/feed"))
        }
        .await;

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close login page: {}", e);
        }
        outcome
    }
}

#[async_trait::async_trait]
impl PageFetcher for BrowserEngine {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<FetchResult> {
        let domain = extract_domain(url)?;

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let browser = self.session(state).await?;

        tracing::debug!(domain = %domain, "Fetching {}", url);
        let result = self.load_page(browser, url, options).await;

        if result.is_ok() {
            if let (Some(pool), Some(proxy)) = (state.proxies.as_mut(), state.current_proxy.as_ref())
            {
                pool.mark_success(proxy);
            }
        }
        result
    }

    async fn reauthenticate(&self, force: bool) -> Result<bool> {
        let mut guard = self.state.lock().await;
        let browser = self.session(&mut guard).await?;

        if !force && self.session_is_active(browser).await {
            tracing::debug!("Existing session is still valid");
            return Ok(true);
        }

        if !self.credentials.is_complete() {
            return Err(BrowserError::MissingCredentials);
        }
        let (Some(email), Some(password)) = (
            self.credentials.email.as_deref(),
            self.credentials.password.as_deref(),
        ) else {
            return Err(BrowserError::MissingCredentials);
        };

        tracing::info!(force, "Logging in to {}", self.profile_domain);
        let logged_in = self.log_in(browser, email, password).await?;
        if logged_in {
            tracing::info!("Login succeeded");
        } else {
            tracing::warn!("Login did not reach the feed page");
        }
        Ok(logged_in)
    }

    async fn rotate_identity(&self) -> Result<IdentityConfig> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if let (Some(pool), Some(previous)) = (state.proxies.as_mut(), state.current_proxy.take()) {
            pool.mark_failure(&previous);
        }
        state.current_proxy = state.proxies.as_mut().and_then(ProxyPool::next);
        state.fingerprint = FingerprintConfig::rotated_from(&state.fingerprint);

        if let Some(session) = state.session.take() {
            Self::shutdown(session).await;
        }

        let identity = IdentityConfig {
            user_agent: state.fingerprint.user_agent.clone(),
            proxy: state.current_proxy.as_ref().map(ProxyEndpoint::server),
        };
        tracing::info!(proxy = ?identity.proxy, "Rotated browser identity");
        Ok(identity)
    }

    async fn close(&self) -> Result<()> {
        let mut guard = self.state.lock().await;
        if let Some(session) = guard.session.take() {
            Self::shutdown(session).await;
            tracing::info!("Browser closed");
        }
        Ok(())
    }
}
