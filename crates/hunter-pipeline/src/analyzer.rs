//! Career summary generation through an LLM provider.

use crate::error::Result;
use hunter_core::{EducationEntry, ExperienceEntry, ExtractedProfile, LlmConfig};
use hunter_llm::{CompletionRequest, LlmProvider};
use std::fmt::Write as _;
use std::sync::Arc;

/// Analysis text used when the provider keeps failing.
pub const ANALYSIS_UNAVAILABLE: &str =
    "A detailed profile analysis could not be generated at this time.";

/// Analysis text used when no provider is configured.
pub const ANALYSIS_DISABLED: &str = "Profile analysis is disabled.";

const SYSTEM_PROMPT: &str = "You are a professional analyst specialized in career profiles.";

/// Summarizes an extracted profile.
#[derive(Clone)]
pub struct ProfileAnalyzer {
    provider: Option<Arc<dyn LlmProvider>>,
    max_tokens: u32,
    temperature: f32,
}

impl ProfileAnalyzer {
    /// Analyzer backed by `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            provider: Some(provider),
            max_tokens,
            temperature,
        }
    }

    /// Analyzer that never calls a provider.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            provider: None,
            max_tokens: 0,
            temperature: 0.0,
        }
    }

    /// Analyzer using the sampling settings from `[llm]`.
    #[must_use]
    pub fn from_config(config: &LlmConfig, provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            provider,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Whether a provider is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Summarize `profile`. Returns [`ANALYSIS_DISABLED`] without a provider.
    pub async fn analyze(&self, profile: &ExtractedProfile) -> Result<String> {
        let Some(provider) = &self.provider else {
            return Ok(ANALYSIS_DISABLED.to_string());
        };

        let request = CompletionRequest::new(Self::build_prompt(profile))
            .with_system_prompt(SYSTEM_PROMPT)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        tracing::debug!(provider = provider.provider_id(), "Requesting profile analysis");
        let response = provider.complete(request).await?;
        Ok(response.content.trim().to_string())
    }

    /// The analysis prompt for `profile`.
    #[must_use]
    pub fn build_prompt(profile: &ExtractedProfile) -> String {
        format!(
            "Analyze the following professional profile and write a concise analysis \
(at most 3 paragraphs) of this person's career path.

PROFILE:
Name: {name}
Current title: {headline}
Location: {location}
About: {about}

Experience:
{experience}
Education:
{education}
Skills:
{skills}

Your analysis should:
1. Identify the main specialization and field of work
2. Highlight career progression and notable achievements
3. Mention relevant education and how it relates to the career path
4. Identify likely professional interests based on the skills

Keep a professional, objective tone and rely only on the data provided.",
            name = or_na(&profile.full_name),
            headline = or_na(&profile.headline),
            location = or_na(&profile.location),
            about = or_na(&profile.about),
            experience = format_experience(&profile.experience),
            education = format_education(&profile.education),
            skills = format_skills(&profile.skills),
        )
    }
}

impl std::fmt::Debug for ProfileAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileAnalyzer")
            .field("provider", &self.provider.as_ref().map(|p| p.provider_id()))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

fn opt(value: Option<&String>) -> &str {
    value.map_or("N/A", |v| or_na(v))
}

fn format_experience(entries: &[ExperienceEntry]) -> String {
    if entries.is_empty() {
        return "No experience available\n".to_string();
    }
    let mut text = String::new();
    for e in entries {
        let _ = writeln!(
            text,
            "- {} at {}, {}, {}",
            opt(e.title.as_ref()),
            opt(e.company.as_ref()),
            opt(e.duration.as_ref()),
            opt(e.location.as_ref()),
        );
    }
    text
}

fn format_education(entries: &[EducationEntry]) -> String {
    if entries.is_empty() {
        return "No education available\n".to_string();
    }
    let mut text = String::new();
    for e in entries {
        let _ = writeln!(
            text,
            "- {} at {}, {}",
            opt(e.degree.as_ref()),
            opt(e.institution.as_ref()),
            opt(e.duration.as_ref()),
        );
    }
    text
}

fn format_skills(skills: &[String]) -> String {
    if skills.is_empty() {
        "No skills available".to_string()
    } else {
        skills.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HuntError;
    use async_trait::async_trait;
    use hunter_llm::{CompletionResponse, LlmError, ProviderCapabilities};
    use std::sync::Mutex;

    struct RecordingProvider {
        reply: std::result::Result<String, u16>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl RecordingProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> hunter_llm::Result<CompletionResponse> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    content: text.clone(),
                    model: "test-model".to_string(),
                    stop_reason: None,
                    usage: None,
                }),
                Err(status) => Err(LlmError::ApiError {
                    provider: "test".to_string(),
                    status: *status,
                    message: "unavailable".to_string(),
                }),
            }
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities {
                max_context_tokens: 8192,
                is_local: true,
                model_name: "test-model".to_string(),
            }
        }

        fn provider_id(&self) -> &str {
            "test"
        }
    }

    fn profile() -> ExtractedProfile {
        ExtractedProfile {
            full_name: "John Smith".to_string(),
            headline: "Software Engineer at Example Corp".to_string(),
            location: "San Francisco, CA".to_string(),
            about: "Experienced software engineer with a passion for AI".to_string(),
            experience: vec![ExperienceEntry {
                title: Some("Software Engineer".to_string()),
                company: Some("Example Corp".to_string()),
                duration: Some("2020 - Present".to_string()),
                location: None,
            }],
            education: vec![EducationEntry {
                institution: Some("Stanford University".to_string()),
                degree: Some("BS in Computer Science".to_string()),
                duration: Some("2012 - 2016".to_string()),
            }],
            skills: vec![
                "Python".to_string(),
                "Machine Learning".to_string(),
                "JavaScript".to_string(),
            ],
            ..ExtractedProfile::default()
        }
    }

    #[test]
    fn test_build_prompt_includes_profile_facts() {
        let prompt = ProfileAnalyzer::build_prompt(&profile());

        assert!(prompt.contains("Name: John Smith"));
        assert!(prompt.contains("Current title: Software Engineer at Example Corp"));
        assert!(prompt.contains("Location: San Francisco, CA"));
        assert!(prompt.contains("Experienced software engineer with a passion for AI"));
        assert!(prompt.contains("- Software Engineer at Example Corp, 2020 - Present, N/A"));
        assert!(prompt.contains("- BS in Computer Science at Stanford University, 2012 - 2016"));
        assert!(prompt.contains("Python, Machine Learning, JavaScript"));
    }

    #[test]
    fn test_build_prompt_for_empty_profile() {
        let prompt = ProfileAnalyzer::build_prompt(&ExtractedProfile::default());

        assert!(prompt.contains("Name: N/A"));
        assert!(prompt.contains("No experience available"));
        assert!(prompt.contains("No education available"));
        assert!(prompt.contains("No skills available"));
    }

    #[tokio::test]
    async fn test_analyze_sends_prompt_with_settings() {
        let provider = Arc::new(RecordingProvider::replying("  A seasoned engineer.\n"));
        let analyzer = ProfileAnalyzer::new(provider.clone(), 512, 0.3);

        let analysis = analyzer.analyze(&profile()).await.expect("analysis");

        assert_eq!(analysis, "A seasoned engineer.");
        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, Some(512));
        assert_eq!(requests[0].temperature, Some(0.3));
        assert_eq!(requests[0].system_prompt.as_deref(), Some(SYSTEM_PROMPT));
        assert!(requests[0].messages[0].content.contains("John Smith"));
    }

    #[tokio::test]
    async fn test_provider_errors_are_returned() {
        let analyzer = ProfileAnalyzer::new(Arc::new(RecordingProvider::failing(503)), 256, 0.5);

        let err = analyzer.analyze(&profile()).await.unwrap_err();

        assert!(matches!(err, HuntError::Llm(_)));
    }

    #[tokio::test]
    async fn test_disabled_analyzer_skips_provider() {
        let analyzer = ProfileAnalyzer::disabled();

        assert!(!analyzer.is_enabled());
        assert_eq!(
            analyzer.analyze(&profile()).await.expect("analysis"),
            ANALYSIS_DISABLED
        );
    }
}
