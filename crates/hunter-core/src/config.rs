//! Configuration management for the profile hunter.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::SearchStrategy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main application configuration.
///
/// This is loaded from `~/.config/profile-hunter/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Profile search settings
    pub search: SearchConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Request pacing settings
    pub rate_limit: RateLimitConfig,
    /// Retry and backoff settings
    pub retry: RetryConfig,
    /// Block recovery settings
    pub recovery: RecoveryConfig,
    /// LLM summarization settings
    pub llm: LlmConfig,
    /// Login credentials for the profile site (never written to disk)
    pub credentials: CredentialsConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides, then validate.
    ///
    /// See [`AppConfig::apply_env_overrides`] for the supported variables.
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Supported variables:
    /// - `LINKEDIN_EMAIL`, `LINKEDIN_PASSWORD`: login credentials
    /// - `GOOGLE_API_KEY`: Gemini API key (also enables the LLM stage)
    /// - `BROWSER_HEADLESS`: headless mode (true/1/t, anything else is headed)
    /// - `BROWSER_TIMEOUT`: navigation timeout in milliseconds
    /// - `REQUESTS_PER_MINUTE`, `JITTER_MIN_MS`, `JITTER_MAX_MS`: pacing
    /// - `MAX_RETRIES`, `RETRY_DELAY`, `BACKOFF_FACTOR`: retry policy
    /// - `SEARCH_STRATEGY`: `google`, `bing` or `direct`
    /// - `PROXIES_FILE`: path to a JSON proxy list
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(email) = lookup("LINKEDIN_EMAIL") {
            self.credentials.email = Some(email);
            tracing::debug!("Override credentials.email from env");
        }
        if let Some(password) = lookup("LINKEDIN_PASSWORD") {
            self.credentials.password = Some(password);
            tracing::debug!("Override credentials.password from env");
        }
        if let Some(key) = lookup("GOOGLE_API_KEY") {
            self.llm.api_key = Some(key);
            self.llm.enabled = true;
            tracing::debug!("Override llm.api_key from env, llm enabled");
        }

        if let Some(val) = lookup("BROWSER_HEADLESS") {
            // Anything but a truthy flag means headed mode.
            self.browser.headless =
                matches!(val.trim().to_lowercase().as_str(), "true" | "1" | "t");
            tracing::debug!("Override browser.headless from env: {}", self.browser.headless);
        }
        if let Some(val) = lookup("BROWSER_TIMEOUT") {
            let mut timeout_ms = self.browser.navigation_timeout_secs * 1000;
            override_value("BROWSER_TIMEOUT", &val, &mut timeout_ms);
            self.browser.navigation_timeout_secs = timeout_ms.div_ceil(1000).max(1);
        }
        if let Some(val) = lookup("PROXIES_FILE") {
            tracing::debug!("Override browser.proxies_file from env: {}", val);
            self.browser.proxies_file = Some(PathBuf::from(val));
        }

        if let Some(val) = lookup("REQUESTS_PER_MINUTE") {
            override_value(
                "REQUESTS_PER_MINUTE",
                &val,
                &mut self.rate_limit.requests_per_minute,
            );
        }
        if let Some(val) = lookup("JITTER_MIN_MS") {
            override_value("JITTER_MIN_MS", &val, &mut self.rate_limit.jitter_min_ms);
        }
        if let Some(val) = lookup("JITTER_MAX_MS") {
            override_value("JITTER_MAX_MS", &val, &mut self.rate_limit.jitter_max_ms);
        }

        if let Some(val) = lookup("MAX_RETRIES") {
            override_value("MAX_RETRIES", &val, &mut self.retry.max_retries);
        }
        if let Some(val) = lookup("RETRY_DELAY") {
            override_value("RETRY_DELAY", &val, &mut self.retry.retry_delay_secs);
        }
        if let Some(val) = lookup("BACKOFF_FACTOR") {
            override_value("BACKOFF_FACTOR", &val, &mut self.retry.backoff_factor);
        }

        if let Some(val) = lookup("SEARCH_STRATEGY") {
            tracing::debug!("Override search.strategy from env: {}", val);
            self.search.strategy = val.to_lowercase();
        }
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        self.search.strategy()?;

        if self.search.profile_domain.trim().is_empty() {
            return Err(ConfigError::invalid("search.profile_domain", "must not be empty"));
        }
        if self.rate_limit.requests_per_minute == 0 {
            return Err(ConfigError::invalid(
                "rate_limit.requests_per_minute",
                "must be greater than zero",
            ));
        }
        if self.rate_limit.jitter_min_ms > self.rate_limit.jitter_max_ms {
            return Err(ConfigError::invalid(
                "rate_limit.jitter_min_ms",
                format!(
                    "must not exceed jitter_max_ms ({} > {})",
                    self.rate_limit.jitter_min_ms, self.rate_limit.jitter_max_ms
                ),
            ));
        }
        if self.retry.backoff_factor <= 0.0 || self.retry.backoff_factor.is_nan() {
            return Err(ConfigError::invalid(
                "retry.backoff_factor",
                "must be positive",
            ));
        }
        if self.retry.retry_delay_secs < 0.0 || !self.retry.retry_delay_secs.is_finite() {
            return Err(ConfigError::invalid(
                "retry.retry_delay_secs",
                "must be a finite, non-negative number",
            ));
        }
        if !matches!(self.llm.provider.as_str(), "gemini" | "ollama") {
            return Err(ConfigError::invalid(
                "llm.provider",
                format!("unknown provider '{}'", self.llm.provider),
            ));
        }
        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist. Credentials and API
    /// keys are never serialized.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::invalid("config_path", "no parent directory"))?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/profile-hunter/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "profile-hunter", "profile-hunter")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn override_value<T>(key: &str, raw: &str, target: &mut T)
where
    T: FromStr + Display,
{
    match raw.trim().parse::<T>() {
        Ok(value) => {
            tracing::debug!("Override {} from env: {}", key, value);
            *target = value;
        }
        Err(_) => tracing::warn!("Ignoring unparseable {} value: {:?}", key, raw),
    }
}

/// Profile search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search strategy: `google`, `bing` or `direct`
    pub strategy: String,
    /// Domain hosting the profiles, without scheme or `www.`
    pub profile_domain: String,
}

impl SearchConfig {
    /// Parse the configured strategy.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for unknown strategies.
    pub fn strategy(&self) -> ConfigResult<SearchStrategy> {
        self.strategy.parse()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: "google".to_string(),
            profile_domain: "linkedin.com".to_string(),
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Selector to wait for after navigation (empty disables the wait)
    pub wait_for_selector: String,
    /// Pick a random desktop fingerprint for each browser launch
    pub rotate_user_agent: bool,
    /// Optional JSON file with the proxy pool
    pub proxies_file: Option<PathBuf>,
    /// Failures after which a proxy is retired
    pub max_proxy_failures: u32,
    /// Ensure a logged-in session before fetching a profile page
    pub login_before_scrape: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 30,
            wait_for_selector: "body".to_string(),
            rotate_user_agent: true,
            proxies_file: None,
            max_proxy_failures: 3,
            login_before_scrape: true,
        }
    }
}

/// Request pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum paced actions per minute
    pub requests_per_minute: u32,
    /// Lower bound of the random extra delay in milliseconds
    pub jitter_min_ms: u64,
    /// Upper bound of the random extra delay in milliseconds
    pub jitter_max_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 5,
            jitter_min_ms: 500,
            jitter_max_ms: 2000,
        }
    }
}

/// Retry and backoff settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Additional attempts after the first failure
    pub max_retries: u32,
    /// Delay before the first retry in seconds
    pub retry_delay_secs: f64,
    /// Multiplier applied to the delay after each retry
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_secs: 5.0,
            backoff_factor: 2.0,
        }
    }
}

/// Block recovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Upper bound for a single recovery wait (unbounded when unset)
    pub max_block_wait_secs: Option<u64>,
    /// Upper bound for the pause after rotating identity
    pub change_proxy_wait_cap_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_block_wait_secs: None,
            change_proxy_wait_cap_secs: 30,
        }
    }
}

/// LLM summarization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Whether the summarization stage calls a provider
    pub enabled: bool,
    /// Provider: `gemini` or `ollama`
    pub provider: String,
    /// Model name (provider default when unset)
    pub model: Option<String>,
    /// Gemini API key (read from the environment, never written to disk)
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Ollama server URL
    pub ollama_url: String,
    /// Maximum tokens for completions
    pub max_tokens: u32,
    /// Temperature for completions
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "gemini".to_string(),
            model: None,
            api_key: None,
            ollama_url: "http://localhost:11434".to_string(),
            max_tokens: 1024,
            temperature: 0.4,
        }
    }
}

/// Login credentials for the profile site.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Account email
    #[serde(skip)]
    pub email: Option<String>,
    /// Account password
    #[serde(skip)]
    pub password: Option<String>,
}

impl CredentialsConfig {
    /// Whether both email and password are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.is_empty())
            && self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("email", &self.email.as_ref().map(|_| "<set>"))
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
