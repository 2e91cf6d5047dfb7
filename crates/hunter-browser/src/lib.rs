//! Browser-backed page fetching for profile pages.
//!
//! Provides the [`PageFetcher`] capability used by the hunt pipeline and a
//! headless Chromium implementation with fingerprint and proxy rotation.

pub mod engine;
pub mod error;
pub mod fetcher;
pub mod fingerprint;
pub mod markdown;
pub mod proxy;

pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
pub use fetcher::{extract_domain, FetchOptions, FetchResult, IdentityConfig, PageFetcher};
pub use fingerprint::FingerprintConfig;
pub use markdown::html_to_markdown;
pub use proxy::{ProxyEndpoint, ProxyPool};
