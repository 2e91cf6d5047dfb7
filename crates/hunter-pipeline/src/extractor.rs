//! Heuristic extraction of career data from a rendered profile page.
//!
//! Every field has its own matcher working on the page title or the
//! markdown rendering. Matchers never fail: a missing section yields an
//! empty value.

use hunter_browser::FetchResult;
use hunter_core::{
    EducationEntry, ExperienceEntry, ExtractedProfile, RecommendationEntry, NAME_NOT_FOUND,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# ([^\n]+)").expect("valid regex"));
static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## ([^\n]+)").expect("valid regex"));
static HEADLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6} [^\n]+\n+([^\n#]+)").expect("valid regex"));
static LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Location|Localização|Local):\s*([^\n]+)").expect("valid regex")
});
static CONNECTIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:,\d+)*\+?)\s+(?:connections|conexões)").expect("valid regex")
});

static ABOUT_SECTION: Lazy<Regex> = Lazy::new(|| section_pattern("About|Sobre"));
static EXPERIENCE_SECTION: Lazy<Regex> = Lazy::new(|| section_pattern("Experience|Experiência"));
static EDUCATION_SECTION: Lazy<Regex> =
    Lazy::new(|| section_pattern("Education|Educação|Formação"));
static SKILLS_SECTION: Lazy<Regex> =
    Lazy::new(|| section_pattern("Skills|Habilidades|Competências"));
static RECOMMENDATIONS_SECTION: Lazy<Regex> =
    Lazy::new(|| section_pattern("Recommendations|Recomendações"));

// A bold or bulleted first line, an optionally marked second line, then
// up to two plain lines.
static EXPERIENCE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\*\*|\* )([^\n]+)(?:\*\*|\*)\n+(?:\*\*|\* )?([^\n]*)(?:\*\*|\*)?\n+(?:([^\n]*)\n+)?(?:([^\n]*)\n+)?",
    )
    .expect("valid regex")
});
static THREE_LINE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\*\*|\* )([^\n]+)(?:\*\*|\*)\n+(?:\*\*|\* )?([^\n]*)(?:\*\*|\*)?\n+(?:([^\n]*)\n+)?")
        .expect("valid regex")
});
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\* |- )([^\n]+)").expect("valid regex"));

fn section_pattern(headers: &str) -> Regex {
    Regex::new(&format!(
        r"(?is)(?:## |### )(?:{headers})[^\n]*\n+(.*?)(?:\n## |\n### |$)"
    ))
    .expect("valid regex")
}

/// Turns fetched profile pages into [`ExtractedProfile`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileExtractor;

impl ProfileExtractor {
    /// Create an extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run every field matcher over `page`.
    #[must_use]
    pub fn extract(&self, page: &FetchResult) -> ExtractedProfile {
        let markdown = page.markdown.as_str();
        ExtractedProfile {
            url: page.url.clone(),
            full_name: extract_full_name(&page.title, markdown),
            headline: extract_headline(markdown).unwrap_or_default(),
            location: extract_location(markdown).unwrap_or_default(),
            about: extract_about(markdown).unwrap_or_default(),
            experience: extract_experience(markdown),
            education: extract_education(markdown),
            skills: extract_skills(markdown),
            recommendations: extract_recommendations(markdown),
            connections: extract_connections(markdown).unwrap_or_default(),
        }
    }
}

/// First non-empty part of the page title (`Name | Site`), else the first `#` heading,
/// else the first `##` heading, else [`NAME_NOT_FOUND`].
#[must_use]
pub fn extract_full_name(title: &str, markdown: &str) -> String {
    title
        .split('|')
        .map(str::trim)
        .find(|part| !part.is_empty())
        .map(str::to_string)
        .or_else(|| first_capture(&H1, markdown))
        .or_else(|| first_capture(&H2, markdown))
        .unwrap_or_else(|| NAME_NOT_FOUND.to_string())
}

/// The line directly below the first heading.
#[must_use]
pub fn extract_headline(markdown: &str) -> Option<String> {
    first_capture(&HEADLINE, markdown)
}

#[must_use]
pub fn extract_location(markdown: &str) -> Option<String> {
    first_capture(&LOCATION, markdown)
}

#[must_use]
pub fn extract_about(markdown: &str) -> Option<String> {
    section(&ABOUT_SECTION, markdown)
}

/// Connection count as displayed, e.g. `1,234` or `500+`.
#[must_use]
pub fn extract_connections(markdown: &str) -> Option<String> {
    first_capture(&CONNECTIONS, markdown)
}

#[must_use]
pub fn extract_experience(markdown: &str) -> Vec<ExperienceEntry> {
    entries(&EXPERIENCE_SECTION, &EXPERIENCE_ENTRY, markdown, |c| {
        ExperienceEntry {
            title: field(c, 1),
            company: field(c, 2),
            duration: field(c, 3),
            location: field(c, 4),
        }
    })
}

#[must_use]
pub fn extract_education(markdown: &str) -> Vec<EducationEntry> {
    entries(&EDUCATION_SECTION, &THREE_LINE_ENTRY, markdown, |c| {
        EducationEntry {
            institution: field(c, 1),
            degree: field(c, 2),
            duration: field(c, 3),
        }
    })
}

#[must_use]
pub fn extract_recommendations(markdown: &str) -> Vec<RecommendationEntry> {
    entries(&RECOMMENDATIONS_SECTION, &THREE_LINE_ENTRY, markdown, |c| {
        RecommendationEntry {
            author: field(c, 1),
            relationship: field(c, 2),
            text: field(c, 3),
        }
    })
}

/// Bulleted lines of the skills section.
#[must_use]
pub fn extract_skills(markdown: &str) -> Vec<String> {
    let Some(body) = section(&SKILLS_SECTION, markdown) else {
        return Vec::new();
    };
    BULLET
        .captures_iter(&body)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect()
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn section(pattern: &Regex, markdown: &str) -> Option<String> {
    first_capture(pattern, markdown)
}

/// Entries of a section, skipping those with no field filled. The body gets
/// a trailing newline so the last entry terminates like the others.
fn entries<T, F>(section_pattern: &Regex, entry_pattern: &Regex, markdown: &str, build: F) -> Vec<T>
where
    T: Default + PartialEq,
    F: Fn(&Captures<'_>) -> T,
{
    let Some(body) = section(section_pattern, markdown) else {
        return Vec::new();
    };
    let body = body + "\n";
    entry_pattern
        .captures_iter(&body)
        .map(|c| build(&c))
        .filter(|entry| *entry != T::default())
        .collect()
}

/// Capture group `index` with stray bold markers and whitespace removed.
fn field(captures: &Captures<'_>, index: usize) -> Option<String> {
    captures
        .get(index)
        .map(|m| m.as_str().trim().trim_matches('*').trim().to_string())
        .filter(|value| !value.is_empty())
}
