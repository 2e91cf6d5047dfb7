//! Shared types used across the profile hunter.
//!
//! Newtypes and small value types that the browser, pipeline and binary
//! crates exchange.

use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier correlating the log lines and report of one hunt.
///
/// Hunt IDs are UUID v4 strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HuntId(String);

impl HuntId {
    /// Create a new random `HuntId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HuntId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the profile finder locates a candidate URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Google results page, `site:` restricted
    Google,
    /// Bing results page, `site:` restricted
    Bing,
    /// Guess vanity URLs from the name and email
    Direct,
}

impl SearchStrategy {
    /// Lowercase name as used in configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Bing => "bing",
            Self::Direct => "direct",
        }
    }
}

impl FromStr for SearchStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "bing" => Ok(Self::Bing),
            "direct" => Ok(Self::Direct),
            other => Err(ConfigError::invalid(
                "search.strategy",
                format!("unknown strategy '{other}', expected google, bing or direct"),
            )),
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity a hunt tries to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityQuery {
    name: String,
    email: String,
    company: String,
}

impl IdentityQuery {
    /// Build a query; surrounding whitespace is trimmed from every field.
    #[must_use]
    pub fn new(name: impl AsRef<str>, email: impl AsRef<str>, company: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            email: email.as_ref().trim().to_string(),
            company: company.as_ref().trim().to_string(),
        }
    }

    /// Full name as provided.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address as provided.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Company name as provided.
    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    /// Text before the first `@`, or the whole email when there is none.
    #[must_use]
    pub fn email_local_part(&self) -> &str {
        self.email.split('@').next().unwrap_or_default()
    }
}

/// A provisionally matched profile URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Profile URL, empty when nothing was found
    pub url: String,
    /// Strategy-assigned confidence in `[0, 1]`
    pub strategy_confidence: f64,
}

impl Candidate {
    /// A found candidate.
    #[must_use]
    pub fn new(url: impl Into<String>, strategy_confidence: f64) -> Self {
        Self {
            url: url.into(),
            strategy_confidence: strategy_confidence.clamp(0.0, 1.0),
        }
    }

    /// The empty, zero-confidence candidate.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            url: String::new(),
            strategy_confidence: 0.0,
        }
    }

    /// Whether a URL was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Milliseconds elapsed since `earlier` (zero if `earlier` is later).
    #[must_use]
    pub fn millis_since(&self, earlier: &Timestamp) -> i64 {
        (self.0 - earlier.0).num_milliseconds().max(0)
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
