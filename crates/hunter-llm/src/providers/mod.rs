//! LLM provider implementations.

pub mod common;
pub mod gemini;
pub mod ollama;

pub use gemini::{GeminiProvider, DEFAULT_GEMINI_MODEL};
pub use ollama::{OllamaProvider, DEFAULT_OLLAMA_MODEL};

use crate::error::{LlmError, Result};
use crate::provider::LlmProvider;
use hunter_core::LlmConfig;
use std::sync::Arc;

/// Build the configured provider, or `None` when summarization is disabled.
///
/// # Errors
/// Returns [`LlmError::AuthenticationFailed`] when Gemini is selected without
/// an API key and [`LlmError::ProviderNotFound`] for unknown providers.
pub fn build_provider(config: &LlmConfig) -> Result<Option<Arc<dyn LlmProvider>>> {
    if !config.enabled {
        return Ok(None);
    }

    let provider: Arc<dyn LlmProvider> = match config.provider.as_str() {
        "gemini" => {
            let api_key = config
                .api_key
                .as_deref()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| LlmError::AuthenticationFailed {
                    provider: "gemini".to_string(),
                    message: "GOOGLE_API_KEY is not set".to_string(),
                })?;
            let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
            Arc::new(GeminiProvider::with_model(api_key, model)?)
        }
        "ollama" => {
            let model = config.model.as_deref().unwrap_or(DEFAULT_OLLAMA_MODEL);
            Arc::new(OllamaProvider::with_url(&config.ollama_url, model)?)
        }
        other => {
            return Err(LlmError::ProviderNotFound {
                provider_id: other.to_string(),
            })
        }
    };

    tracing::info!(
        provider = provider.provider_id(),
        model = %provider.capabilities().model_name,
        "LLM provider configured"
    );
    Ok(Some(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_builds_nothing() {
        let config = LlmConfig::default();
        assert!(build_provider(&config).expect("build provider").is_none());
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let config = LlmConfig {
            enabled: true,
            ..LlmConfig::default()
        };
        assert!(matches!(
            build_provider(&config),
            Err(LlmError::AuthenticationFailed { .. })
        ));
    }

    #[test]
    fn test_builds_configured_provider() {
        let gemini = LlmConfig {
            enabled: true,
            api_key: Some("key".to_string()),
            ..LlmConfig::default()
        };
        let provider = build_provider(&gemini)
            .expect("build provider")
            .expect("provider present");
        assert_eq!(provider.provider_id(), "gemini");

        let ollama = LlmConfig {
            enabled: true,
            provider: "ollama".to_string(),
            model: Some("mistral".to_string()),
            ..LlmConfig::default()
        };
        let provider = build_provider(&ollama)
            .expect("build provider")
            .expect("provider present");
        assert_eq!(provider.provider_id(), "ollama");
        assert_eq!(provider.capabilities().model_name, "mistral");
    }

    #[test]
    fn test_unknown_provider() {
        let config = LlmConfig {
            enabled: true,
            provider: "openai".to_string(),
            ..LlmConfig::default()
        };
        assert!(matches!(
            build_provider(&config),
            Err(LlmError::ProviderNotFound { .. })
        ));
    }
}
