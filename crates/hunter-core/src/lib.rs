//! Hunter Core - Foundation crate for the profile hunter.
//!
//! This crate provides the shared data model, error handling and
//! configuration management that the browser, LLM and pipeline crates
//! depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared newtypes (`HuntId`, `IdentityQuery`, `Candidate`, `Timestamp`)
//! - [`profile`] - Extracted profile structures
//!
//! # Example
//!
//! ```rust
//! use hunter_core::{AppConfig, IdentityQuery};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! config.validate()?;
//!
//! let query = IdentityQuery::new("John Smith", "john.smith@example.com", "Example Corp");
//! assert_eq!(query.email_local_part(), "john.smith");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod profile;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, CredentialsConfig, LlmConfig, RateLimitConfig, RecoveryConfig,
    RetryConfig, SearchConfig,
};
pub use error::{ConfigError, ConfigResult, HunterError, Result};
pub use profile::{
    EducationEntry, ExperienceEntry, ExtractedProfile, RecommendationEntry, NAME_NOT_FOUND,
};
pub use types::{Candidate, HuntId, IdentityQuery, SearchStrategy, Timestamp};
