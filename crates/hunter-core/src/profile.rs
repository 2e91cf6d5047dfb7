//! Structured career data extracted from a profile page.
//!
//! Every field is optional or defaults to empty: a missing section never
//! fails a hunt.

use serde::{Deserialize, Serialize};

/// Sentinel used when no name can be recovered from a page.
pub const NAME_NOT_FOUND: &str = "Name not found";

/// One job entry, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    /// Job title
    pub title: Option<String>,
    /// Employer name
    pub company: Option<String>,
    /// Free-form date range
    pub duration: Option<String>,
    /// Job location
    pub location: Option<String>,
}

/// One education entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    /// School or university
    pub institution: Option<String>,
    /// Degree and field
    pub degree: Option<String>,
    /// Free-form date range
    pub duration: Option<String>,
}

/// One received recommendation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    /// Who wrote it
    pub author: Option<String>,
    /// How the author knows the profile owner
    pub relationship: Option<String>,
    /// Recommendation body
    pub text: Option<String>,
}

/// Everything the extractor could recover from one profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedProfile {
    /// Profile URL the data came from
    pub url: String,
    /// Display name, or [`NAME_NOT_FOUND`]
    pub full_name: String,
    /// Headline under the name
    pub headline: String,
    /// Location line
    pub location: String,
    /// About section body
    pub about: String,
    /// Experience entries, current position first
    pub experience: Vec<ExperienceEntry>,
    /// Education entries
    pub education: Vec<EducationEntry>,
    /// Listed skills
    pub skills: Vec<String>,
    /// Received recommendations
    pub recommendations: Vec<RecommendationEntry>,
    /// Connection count as displayed (e.g. `500+`)
    pub connections: String,
}

impl ExtractedProfile {
    /// The current position, taken to be the first experience entry.
    #[must_use]
    pub fn current_experience(&self) -> Option<&ExperienceEntry> {
        self.experience.first()
    }

    /// Whether a real name was recovered.
    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.full_name.is_empty() && self.full_name != NAME_NOT_FOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_experience_is_first_entry() {
        let profile = ExtractedProfile {
            experience: vec![
                ExperienceEntry {
                    company: Some("Example Corp".to_string()),
                    ..Default::default()
                },
                ExperienceEntry {
                    company: Some("Old Co".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(
            profile
                .current_experience()
                .and_then(|e| e.company.as_deref()),
            Some("Example Corp")
        );
        assert!(ExtractedProfile::default().current_experience().is_none());
    }

    #[test]
    fn test_has_name() {
        let mut profile = ExtractedProfile {
            full_name: NAME_NOT_FOUND.to_string(),
            ..Default::default()
        };
        assert!(!profile.has_name());
        profile.full_name = "Jane Doe".to_string();
        assert!(profile.has_name());
    }

    #[test]
    fn test_profile_serialization_keeps_missing_fields() {
        let profile = ExtractedProfile {
            url: "https://www.linkedin.com/in/janedoe".to_string(),
            full_name: "Jane Doe".to_string(),
            education: vec![EducationEntry {
                institution: Some("State University".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&profile).expect("serialize profile");
        assert!(json.contains("\"degree\":null"));

        let parsed: ExtractedProfile = serde_json::from_str(&json).expect("parse profile");
        assert_eq!(parsed, profile);
    }
}
