//! Hunt output: the flat result record and the detailed report.

use hunter_core::{
    Candidate, EducationEntry, ExperienceEntry, ExtractedProfile, HuntId, IdentityQuery,
    Timestamp,
};
use serde::{Deserialize, Serialize};

/// `ProfileUrl` value when no profile was found.
pub const PROFILE_NOT_FOUND: &str = "Profile not found";

/// `ProfileAnalysis` value when no profile was found.
pub const NOT_FOUND_ANALYSIS: &str =
    "Could not find a professional profile matching the provided details.";

const NOT_AVAILABLE: &str = "N/A";

/// Final result of one hunt, serialized with PascalCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HuntResult {
    /// Queried name
    pub name: String,
    /// Queried email
    pub email: String,
    /// Queried company
    pub company: String,
    /// Confidence rendered as a percentage, e.g. `97.0%`
    pub confidence: String,
    /// Profile URL or [`PROFILE_NOT_FOUND`]
    pub profile_url: String,
    /// Headline or `N/A`
    pub current_title: String,
    /// All extracted positions, current first
    pub prior_experience: Vec<ExperienceEntry>,
    /// Extracted education entries
    pub education: Vec<EducationEntry>,
    /// Extracted skills
    pub top_skills: Vec<String>,
    /// LLM summary or a fixed fallback sentence
    pub profile_analysis: String,
}

impl HuntResult {
    /// The labeled empty result for a hunt that found no candidate.
    #[must_use]
    pub fn not_found(query: &IdentityQuery) -> Self {
        Self {
            name: query.name().to_string(),
            email: query.email().to_string(),
            company: query.company().to_string(),
            confidence: "0%".to_string(),
            profile_url: PROFILE_NOT_FOUND.to_string(),
            current_title: NOT_AVAILABLE.to_string(),
            prior_experience: Vec::new(),
            education: Vec::new(),
            top_skills: Vec::new(),
            profile_analysis: NOT_FOUND_ANALYSIS.to_string(),
        }
    }

    /// Result for a found and extracted profile.
    #[must_use]
    pub fn found(
        query: &IdentityQuery,
        candidate: &Candidate,
        profile: &ExtractedProfile,
        confidence: f64,
        analysis: String,
    ) -> Self {
        let current_title = if profile.headline.trim().is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            profile.headline.clone()
        };

        Self {
            name: query.name().to_string(),
            email: query.email().to_string(),
            company: query.company().to_string(),
            confidence: format_confidence(confidence),
            profile_url: candidate.url.clone(),
            current_title,
            prior_experience: profile.experience.clone(),
            education: profile.education.clone(),
            top_skills: profile.skills.clone(),
            profile_analysis: analysis,
        }
    }

    /// Whether a profile was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.profile_url != PROFILE_NOT_FOUND
    }
}

/// Render a score like a float percentage: `97.0%`, `85.5%`, `85.25%`.
#[must_use]
pub fn format_confidence(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}%")
    } else {
        format!("{score}%")
    }
}

/// Structured record of a hunt including intermediate data.
#[derive(Debug, Clone, Serialize)]
pub struct HuntReport {
    /// Correlates the report with the hunt's log lines
    pub hunt_id: HuntId,
    /// The input identity
    pub query: IdentityQuery,
    /// The finder's candidate, possibly not found
    pub candidate: Candidate,
    /// Extracted profile, absent when nothing was found
    pub profile: Option<ExtractedProfile>,
    /// Confidence in `[0, 100]`
    pub confidence: f64,
    /// When the hunt started
    pub started_at: Timestamp,
    /// When the hunt finished
    pub completed_at: Timestamp,
    /// The flat result
    pub result: HuntResult,
}

impl HuntReport {
    /// Wall-clock duration of the hunt in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.completed_at.millis_since(&self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> IdentityQuery {
        IdentityQuery::new("John Smith", "john.smith@example.com", "Example Corp")
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(97.0), "97.0%");
        assert_eq!(format_confidence(85.5), "85.5%");
        assert_eq!(format_confidence(85.25), "85.25%");
        assert_eq!(format_confidence(0.0), "0.0%");
    }

    #[test]
    fn test_not_found_result() {
        let result = HuntResult::not_found(&query());

        assert_eq!(result.confidence, "0%");
        assert_eq!(result.profile_url, PROFILE_NOT_FOUND);
        assert_eq!(result.current_title, "N/A");
        assert!(result.prior_experience.is_empty());
        assert!(result.education.is_empty());
        assert!(result.top_skills.is_empty());
        assert_eq!(result.profile_analysis, NOT_FOUND_ANALYSIS);
        assert!(!result.is_found());
    }

    #[test]
    fn test_found_result_without_headline() {
        let profile = ExtractedProfile {
            full_name: "John Smith".to_string(),
            skills: vec!["Rust".to_string()],
            ..ExtractedProfile::default()
        };
        let candidate = Candidate::new("https://www.linkedin.com/in/john-smith", 0.8);

        let result = HuntResult::found(&query(), &candidate, &profile, 72.5, "Summary".into());

        assert!(result.is_found());
        assert_eq!(result.profile_url, "https://www.linkedin.com/in/john-smith");
        assert_eq!(result.current_title, "N/A");
        assert_eq!(result.confidence, "72.5%");
        assert_eq!(result.top_skills, vec!["Rust"]);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(HuntResult::not_found(&query())).expect("serialize");
        let object = json.as_object().expect("object");

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "Company",
                "Confidence",
                "CurrentTitle",
                "Education",
                "Email",
                "Name",
                "PriorExperience",
                "ProfileAnalysis",
                "ProfileUrl",
                "TopSkills",
            ]
        );
        assert_eq!(json["Confidence"], "0%");
    }
}
