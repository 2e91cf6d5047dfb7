//! Hunter LLM - summarization providers for extracted profiles.
//!
//! This crate provides a single completion trait with Gemini and Ollama
//! backends, plus a factory that builds the configured provider.
//!
//! # Example
//!
//! ```rust,no_run
//! use hunter_llm::{CompletionRequest, GeminiProvider, LlmProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gemini = GeminiProvider::new("api-key")?;
//!
//! let request = CompletionRequest::new("Summarize this career in one paragraph: ...")
//!     .with_max_tokens(512);
//! let response = gemini.complete(request).await?;
//!
//! println!("Response: {}", response.content);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod provider;
pub mod providers;

// Re-export commonly used types
pub use error::{LlmError, Result};
pub use provider::{
    CompletionRequest, CompletionResponse, LlmProvider, Message, ProviderCapabilities, Role,
    Usage,
};
pub use providers::{build_provider, GeminiProvider, OllamaProvider};
