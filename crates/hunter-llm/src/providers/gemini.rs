//! Google Gemini API provider implementation.

use crate::error::{LlmError, Result};
use crate::provider::{
    CompletionRequest, CompletionResponse, LlmProvider, ProviderCapabilities, Usage,
};
use crate::providers::common::{build_http_client, check_status, convert_role_gemini};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini API provider.
///
/// Supports Gemini models via Google's `generateContent` API.
/// Note: Gemini uses "user"/"model" roles instead of "user"/"assistant".
pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given API key.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_model(api_key, DEFAULT_GEMINI_MODEL)
    }

    /// Create a new Gemini provider with a specific model.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            client: build_http_client(Some(60))?,
        })
    }

    /// Convert internal request to Gemini API format.
    fn to_api_request(request: &CompletionRequest) -> GeminiRequest {
        let system_instruction = request.system_prompt.as_ref().map(|prompt| GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: prompt.clone(),
            }],
        });

        let contents = request
            .messages
            .iter()
            .map(|message| GeminiContent {
                role: Some(convert_role_gemini(message.role)),
                parts: vec![GeminiPart {
                    text: message.content.clone(),
                }],
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: Some(GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            }),
        }
    }

    /// Convert Gemini API response to internal format.
    fn convert_api_response(&self, response: GeminiResponse) -> Result<CompletionResponse> {
        let candidate =
            response
                .candidates
                .into_iter()
                .next()
                .ok_or_else(|| LlmError::ParseError {
                    provider: "gemini".to_string(),
                    message: "no candidates in response".to_string(),
                })?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::ParseError {
                provider: "gemini".to_string(),
                message: format!(
                    "empty candidate (finish reason: {})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            });
        }

        Ok(CompletionResponse {
            content: text,
            model: response
                .model_version
                .unwrap_or_else(|| self.model.clone()),
            stop_reason: candidate.finish_reason,
            usage: response.usage_metadata.map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            }),
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let api_request = Self::to_api_request(&request);

        tracing::debug!(model = %self.model, "Sending Gemini generateContent request");
        let response = self
            .client
            .post(format!(
                "{GEMINI_API_BASE}/models/{}:generateContent",
                self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&api_request)
            .send()
            .await?;

        let response = check_status("gemini", response).await?;

        let api_response: GeminiResponse =
            response.json().await.map_err(|e| LlmError::ParseError {
                provider: "gemini".to_string(),
                message: format!("failed to parse response: {e}"),
            })?;

        self.convert_api_response(api_response)
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            max_context_tokens: 1_048_576,
            is_local: false,
            model_name: self.model.clone(),
        }
    }

    fn provider_id(&self) -> &'static str {
        "gemini"
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    model_version: Option<String>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key").expect("create provider");
        assert_eq!(provider.provider_id(), "gemini");
        assert_eq!(provider.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_provider_with_custom_model() {
        let provider =
            GeminiProvider::with_model("test-key", "gemini-1.5-pro").expect("create provider");
        assert_eq!(provider.model, "gemini-1.5-pro");
        assert_eq!(provider.capabilities().model_name, "gemini-1.5-pro");
        assert!(!provider.capabilities().is_local);
    }

    #[test]
    fn test_api_request_serialization() {
        let request = CompletionRequest::new("Hello")
            .with_max_tokens(1000)
            .with_temperature(0.5)
            .with_system_prompt("You are helpful");

        let json = serde_json::to_value(GeminiProvider::to_api_request(&request))
            .expect("serialize request");

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "You are helpful");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1000);
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_role_conversion() {
        let request = CompletionRequest {
            messages: vec![
                crate::provider::Message::user("User message"),
                crate::provider::Message::assistant("Assistant message"),
            ],
            max_tokens: None,
            temperature: None,
            system_prompt: None,
        };

        let api_request = GeminiProvider::to_api_request(&request);

        assert_eq!(api_request.contents.len(), 2);
        assert_eq!(api_request.contents[0].role.as_deref(), Some("user"));
        assert_eq!(api_request.contents[1].role.as_deref(), Some("model"));
    }

    #[test]
    fn test_response_conversion() {
        let provider = GeminiProvider::new("test-key").expect("create provider");
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "A seasoned engineer."}]},
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-2.0-flash-001",
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 30}
        }"#;
        let parsed: GeminiResponse = serde_json::from_str(raw).expect("parse response");

        let response = provider.convert_api_response(parsed).expect("convert response");
        assert_eq!(response.content, "A seasoned engineer.");
        assert_eq!(response.model, "gemini-2.0-flash-001");
        assert_eq!(response.stop_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage.map(|u| u.total_tokens()), Some(150));
    }

    #[test]
    fn test_blocked_response_is_an_error() {
        let provider = GeminiProvider::new("test-key").expect("create provider");
        let raw = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(raw).expect("parse response");

        let err = provider.convert_api_response(parsed).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));

        let empty: GeminiResponse = serde_json::from_str("{}").expect("parse response");
        assert!(provider.convert_api_response(empty).is_err());
    }
}
