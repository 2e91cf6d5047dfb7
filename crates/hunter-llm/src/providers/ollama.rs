//! Ollama local LLM provider implementation.

use crate::error::{LlmError, Result};
use crate::provider::{
    CompletionRequest, CompletionResponse, LlmProvider, ProviderCapabilities, Role, Usage,
};
use crate::providers::common::{build_http_client, check_status};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";

/// Ollama local LLM provider.
///
/// Connects to a local Ollama instance so profile data never leaves the machine.
pub struct OllamaProvider {
    model: String,
    client: Client,
    base_url: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider with custom URL and model.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_url(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            model: model.into(),
            client: build_http_client(Some(120))?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Convert internal request to Ollama API format.
    fn to_api_request(&self, request: &CompletionRequest) -> OllamaRequest {
        let mut prompt_parts = Vec::new();

        if let Some(system) = &request.system_prompt {
            prompt_parts.push(format!("System: {system}"));
        }

        for message in &request.messages {
            let prefix = match message.role {
                Role::User => "User:",
                Role::Assistant => "Assistant:",
                Role::System => "System:",
            };
            prompt_parts.push(format!("{prefix} {}", message.content));
        }

        prompt_parts.push("Assistant:".to_string());

        OllamaRequest {
            model: self.model.clone(),
            prompt: prompt_parts.join("\n\n"),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }

    /// Convert Ollama API response to internal format.
    fn convert_api_response(response: OllamaResponse) -> CompletionResponse {
        let usage = match (response.prompt_eval_count, response.eval_count) {
            (Some(input_tokens), Some(output_tokens)) => Some(Usage {
                input_tokens,
                output_tokens,
            }),
            _ => None,
        };

        CompletionResponse {
            content: response.response,
            model: response.model,
            stop_reason: response.done.then(|| "stop".to_string()),
            usage,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let api_request = self.to_api_request(&request);

        tracing::debug!(model = %self.model, "Sending Ollama generate request");
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&api_request)
            .send()
            .await?;

        let response = check_status("ollama", response).await?;

        let api_response: OllamaResponse =
            response.json().await.map_err(|e| LlmError::ParseError {
                provider: "ollama".to_string(),
                message: format!("failed to parse response: {e}"),
            })?;

        Ok(Self::convert_api_response(api_response))
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            max_context_tokens: 8192,
            is_local: true,
            model_name: self.model.clone(),
        }
    }

    fn provider_id(&self) -> &'static str {
        "ollama"
    }
}

// Ollama API types

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Default, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    response: String,
    done: bool,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}
