//! Hunter Pipeline - profile search, extraction and confidence scoring.
//!
//! This crate resolves an identity (name, email, company) to a professional
//! profile page. It coordinates the page fetcher, block detection and
//! recovery, heuristic extraction and fuzzy identity matching, with rate
//! limiting and retry around every remote step.
//!
//! # Features
//!
//! - Google, Bing or direct vanity-URL search with confidence tiers
//! - Block, login-wall and rate-limit detection with recovery actions
//! - Name, company and email matching with a weighted confidence score
//! - Optional LLM career summary with a fixed fallback
//!
//! # Example
//!
//! ```rust,ignore
//! use hunter_browser::BrowserEngine;
//! use hunter_core::{AppConfig, IdentityQuery};
//! use hunter_pipeline::Hunter;
//! use std::sync::Arc;
//!
//! let config = AppConfig::load_with_env()?;
//! let engine = Arc::new(BrowserEngine::from_config(&config)?);
//! let hunter = Hunter::from_config(&config, engine, None)?;
//!
//! let query = IdentityQuery::new("John Smith", "john.smith@example.com", "Example Corp");
//! let result = hunter.hunt_and_close(&query).await?;
//! println!("{} {}", result.profile_url, result.confidence);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod analyzer;
pub mod block;
pub mod confidence;
#[allow(missing_docs)]
pub mod error;
#[allow(missing_docs)]
pub mod extractor;
pub mod finder;
pub mod guard;
pub mod orchestrator;
pub mod profile_scraper;
pub mod rate_limit;
pub mod report;
pub mod retry;
pub mod similarity;

// Re-export commonly used types
pub use analyzer::{ProfileAnalyzer, ANALYSIS_DISABLED, ANALYSIS_UNAVAILABLE};
pub use block::{
    BlockDetectionResult, BlockDetector, BlockKind, RecommendedAction, RecoveryAction, WaitTime,
    WaitUnit,
};
pub use confidence::ConfidenceCalculator;
pub use error::{HuntError, Result};
pub use extractor::ProfileExtractor;
pub use finder::ProfileFinder;
pub use guard::BlockGuard;
pub use orchestrator::{HuntStage, Hunter};
pub use profile_scraper::ProfileScraper;
pub use rate_limit::RateLimiter;
pub use report::{HuntReport, HuntResult, NOT_FOUND_ANALYSIS, PROFILE_NOT_FOUND};
pub use retry::{RetryExecutor, Retryable};
