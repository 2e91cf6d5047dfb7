//! Confidence that an extracted profile belongs to the queried identity.
//!
//! The score is a weighted blend of three sub-scores in `[0, 1]`:
//! name (40), company (30) and email (30). The thresholds below are
//! calibration points; changing them shifts every reported confidence.

use crate::similarity::ratio;
use hunter_core::{ExperienceEntry, ExtractedProfile, IdentityQuery};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

const NAME_WEIGHT: f64 = 40.0;
const COMPANY_WEIGHT: f64 = 30.0;
const EMAIL_WEIGHT: f64 = 30.0;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid regex"));

/// Fold to lowercase ASCII: NFKD decomposition with non-ASCII code points
/// dropped, then trimmed.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Scores identity matches between a query and an extracted profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceCalculator;

impl ConfidenceCalculator {
    /// Create a calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Overall confidence in `[0, 100]`, rounded to two decimals.
    #[must_use]
    pub fn score(&self, query: &IdentityQuery, profile: &ExtractedProfile) -> f64 {
        let profile_name = if profile.has_name() {
            profile.full_name.as_str()
        } else {
            ""
        };

        let name = Self::name_score(query.name(), profile_name);
        let company = Self::company_score(query.company(), &profile.experience);
        let email = Self::email_score(query.email(), profile);

        let weighted = name * NAME_WEIGHT + company * COMPANY_WEIGHT + email * EMAIL_WEIGHT;
        let percent = weighted / (NAME_WEIGHT + COMPANY_WEIGHT + EMAIL_WEIGHT) * 100.0;

        tracing::debug!(name, company, email, percent, "Confidence sub-scores");
        ((percent * 100.0).round() / 100.0).clamp(0.0, 100.0)
    }

    /// Similarity of two person names in `[0, 1]`.
    #[must_use]
    pub fn name_score(input_name: &str, profile_name: &str) -> f64 {
        let input = normalize(input_name);
        let profile = normalize(profile_name);
        if input.is_empty() || profile.is_empty() {
            return 0.0;
        }

        if input == profile {
            return 1.0;
        }

        let input_tokens: Vec<&str> = input.split_whitespace().collect();
        let profile_tokens: Vec<&str> = profile.split_whitespace().collect();

        let profile_set: HashSet<&str> = profile_tokens.iter().copied().collect();
        if input_tokens.iter().all(|token| profile_set.contains(token)) {
            return 0.9;
        }

        if input_tokens.len() >= 2
            && profile_tokens.len() >= 2
            && input_tokens.first() == profile_tokens.first()
            && input_tokens.last() == profile_tokens.last()
        {
            return 0.8;
        }

        let similarity = ratio(&input, &profile);
        if similarity > 0.7 {
            return similarity;
        }

        if initials(&input_tokens) == initials(&profile_tokens) {
            return 0.6;
        }

        similarity
    }

    /// How well the queried company matches the profile's experience, in `[0, 1]`.
    ///
    /// The current (first) position is weighted above past positions.
    /// Entries without a company name are ignored.
    #[must_use]
    pub fn company_score(input_company: &str, experience: &[ExperienceEntry]) -> f64 {
        let input = normalize(input_company);
        if input.is_empty() || experience.is_empty() {
            return 0.0;
        }

        if let Some(current) = experience.first().and_then(company_name) {
            if input == current {
                return 1.0;
            }
            let similarity = ratio(&input, &current);
            if similarity > 0.7 {
                return similarity;
            }
            if input.contains(current.as_str()) || current.contains(input.as_str()) {
                return 0.8;
            }
        }

        let mut best: f64 = 0.0;
        for company in experience.iter().filter_map(company_name) {
            if input == company {
                return 0.9;
            }
            best = best.max(ratio(&input, &company));
            if input.contains(company.as_str()) || company.contains(input.as_str()) {
                best = best.max(0.7);
            }
        }
        best
    }

    /// How well the queried email fits the profile, in `[0, 1]`.
    #[must_use]
    pub fn email_score(email: &str, profile: &ExtractedProfile) -> f64 {
        let email = email.trim();
        let Some((local, _)) = email.split_once('@') else {
            return 0.0;
        };
        if local.is_empty() {
            return 0.0;
        }
        let username = local.to_lowercase();

        let full_name = if profile.has_name() {
            normalize(&profile.full_name)
        } else {
            String::new()
        };
        if full_name.replace(' ', "").contains(&username) {
            return 0.8;
        }

        let parts: Vec<&str> = full_name.split_whitespace().collect();
        if let [first, .., last] = parts.as_slice() {
            let initial: String = first.chars().take(1).collect();
            let patterns = [
                format!("{first}.{last}"),
                format!("{first}_{last}"),
                format!("{first}{last}"),
                format!("{initial}{last}"),
            ];
            for pattern in &patterns {
                if username == *pattern {
                    return 0.9;
                }
                if ratio(&username, pattern) > 0.8 {
                    return 0.7;
                }
            }
        }

        let domain = email
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_lowercase())
            .unwrap_or_default();
        if let Some(company) = profile.current_experience().and_then(company_name) {
            let matches_domain = WORD
                .find_iter(&company)
                .any(|word| word.as_str().len() > 3 && domain.contains(word.as_str()));
            if matches_domain {
                return 0.6;
            }
        }

        0.2
    }
}

fn company_name(entry: &ExperienceEntry) -> Option<String> {
    entry
        .company
        .as_deref()
        .map(normalize)
        .filter(|name| !name.is_empty())
}

fn initials(tokens: &[&str]) -> String {
    tokens.iter().filter_map(|token| token.chars().next()).collect()
}
