//! Anti-automation and availability detection for fetched pages.
//!
//! A page is classified by four independent signal sources (visible text,
//! CSS markers, URL markers and redirect targets) into a set of
//! [`BlockKind`]s, and the set is mapped to a single [`RecommendedAction`]
//! by a fixed priority table.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Why a fetch did not yield usable profile content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Profile view or request quota reached
    RateLimit,
    /// CAPTCHA or other human verification
    SecurityCheck,
    /// Content hidden behind a sign-in wall
    LoginRequired,
    /// The logged-in account is restricted or suspended
    AccountRestricted,
    /// The page does not exist
    NotFound,
    /// Profile hidden or out of network
    PrivateProfile,
    /// The network address is blocked
    IpBlock,
}

impl BlockKind {
    /// Snake-case name used in logs and reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimit => "rate_limit",
            Self::SecurityCheck => "security_check",
            Self::LoginRequired => "login_required",
            Self::AccountRestricted => "account_restricted",
            Self::NotFound => "not_found",
            Self::PrivateProfile => "private_profile",
            Self::IpBlock => "ip_block",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller should do about a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    /// The page is usable
    Continue,
    /// Give up on this account
    Stop,
    /// Switch proxy and browser identity
    ChangeProxy,
    /// A human has to clear a challenge
    ManualIntervention,
    /// Back off and try again later
    Wait,
    /// Sign in again
    Login,
    /// Nothing to scrape here
    Skip,
}

impl RecoveryAction {
    /// Whether no automatic recovery exists.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Stop | Self::ManualIntervention)
    }

    /// Snake-case name used in logs and reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Stop => "stop",
            Self::ChangeProxy => "change_proxy",
            Self::ManualIntervention => "manual_intervention",
            Self::Wait => "wait",
            Self::Login => "login",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a wait time announced by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUnit {
    /// Minutes
    Minutes,
    /// Hours
    Hours,
    /// Days
    Days,
}

impl WaitUnit {
    fn seconds(self) -> u64 {
        match self {
            Self::Minutes => 60,
            Self::Hours => 3_600,
            Self::Days => 86_400,
        }
    }

    fn parse(unit: &str) -> Option<Self> {
        match unit.to_lowercase().trim_end_matches('s') {
            "minute" | "minuto" => Some(Self::Minutes),
            "hour" | "hora" => Some(Self::Hours),
            "day" | "dia" => Some(Self::Days),
            _ => None,
        }
    }
}

/// A wait time parsed from a rate-limit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTime {
    /// Number of units
    pub value: u64,
    /// Unit of `value`
    pub unit: WaitUnit,
}

impl WaitTime {
    /// The wait as a duration.
    #[must_use]
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.value.saturating_mul(self.unit.seconds()))
    }
}

/// Extra information collected from a blocked page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDetails {
    /// Text of the page's error and alert elements
    pub error_messages: Vec<String>,
    /// Wait time announced by a rate-limit message
    pub wait_time: Option<WaitTime>,
}

/// Outcome of [`BlockDetector::detect`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDetectionResult {
    /// Whether any block kind was detected
    pub is_blocked: bool,
    /// Every detected kind, in declaration order
    pub block_types: BTreeSet<BlockKind>,
    /// Messages and wait time found on the page
    pub details: BlockDetails,
}

impl BlockDetectionResult {
    /// Whether `kind` was detected.
    #[must_use]
    pub fn has(&self, kind: BlockKind) -> bool {
        self.block_types.contains(&kind)
    }
}

/// The single action chosen for a detection result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendedAction {
    /// What to do
    pub action: RecoveryAction,
    /// The block kind that decided the action, if any
    pub reason: Option<BlockKind>,
    /// Human-readable explanation
    pub message: String,
    /// How long to back off before acting again
    pub wait: Duration,
}

impl RecommendedAction {
    fn new(action: RecoveryAction, reason: Option<BlockKind>, message: &str, wait_secs: u64) -> Self {
        Self {
            action,
            reason,
            message: message.to_string(),
            wait: Duration::from_secs(wait_secs),
        }
    }
}

/// Text patterns matched against the normalized visible text of a page.
const TEXT_PATTERNS: &[(BlockKind, &[&str])] = &[
    (
        BlockKind::RateLimit,
        &[
            r"you've\s+reached\s+the\s+(?:weekly|monthly)?\s*(?:limit|maximum)",
            r"você\s+atingiu\s+o\s+(?:limite|máximo)\s+(?:semanal|mensal)?",
            r"you've\s+viewed\s+the\s+maximum\s+number\s+of\s+profiles",
            r"try\s+again\s+later",
            r"tente\s+novamente\s+mais\s+tarde",
            r"come\s+back\s+later\s+to\s+view\s+more\s+profiles",
        ],
    ),
    (
        BlockKind::SecurityCheck,
        &[
            r"security\s+verification",
            r"verificação\s+de\s+segurança",
            r"prove\s+you're\s+a\s+person",
            r"prove\s+que\s+você\s+é\s+humano",
            r"captcha",
            r"are\s+you\s+a\s+robot",
            r"você\s+é\s+um\s+robô",
            r"unusual\s+activity",
            r"atividade\s+incomum",
        ],
    ),
    (
        BlockKind::LoginRequired,
        &[
            r"please\s+log\s+in\s+to\s+continue",
            r"faça\s+login\s+para\s+continuar",
            r"join\s+now\s+to\s+view",
            r"cadastre-se\s+para\s+ver",
            r"sign\s+in\s+to\s+view",
            r"entrar\s+para\s+ver",
        ],
    ),
    (
        BlockKind::AccountRestricted,
        &[
            r"your\s+account\s+has\s+been\s+restricted",
            r"sua\s+conta\s+foi\s+restrita",
            r"account\s+temporarily\s+restricted",
            r"conta\s+temporariamente\s+restrita",
            r"suspicious\s+activity",
            r"atividade\s+suspeita",
            r"we've\s+noticed\s+some\s+unusual\s+activity",
            r"notamos\s+alguma\s+atividade\s+incomum",
        ],
    ),
    (
        BlockKind::NotFound,
        &[
            r"page\s+not\s+found",
            r"página\s+não\s+encontrada",
            r"this\s+page\s+doesn't\s+exist",
            r"esta\s+página\s+não\s+existe",
            r"hmm,\s+we\s+can't\s+reach\s+this\s+page",
            r"hmm,\s+não\s+conseguimos\s+acessar\s+esta\s+página",
        ],
    ),
    (
        BlockKind::PrivateProfile,
        &[
            r"this\s+profile\s+is\s+not\s+available",
            r"este\s+perfil\s+não\s+está\s+disponível",
            r"out\s+of\s+your\s+network",
            r"fora\s+da\s+sua\s+rede",
            r"to\s+see\s+this\s+profile,\s+upgrade\s+to\s+premium",
            r"para\s+ver\s+este\s+perfil,\s+atualize\s+para\s+o\s+premium",
        ],
    ),
    (
        BlockKind::IpBlock,
        &[
            r"we've\s+detected\s+unusual\s+activity\s+from\s+your\s+network",
            r"detectamos\s+atividade\s+incomum\s+da\s+sua\s+rede",
            r"your\s+ip\s+address\s+has\s+been\s+temporarily\s+blocked",
            r"seu\s+endereço\s+ip\s+foi\s+temporariamente\s+bloqueado",
            r"too\s+many\s+requests",
            r"muitas\s+solicitações",
        ],
    ),
];

/// CSS selectors whose presence indicates a block.
const CSS_MARKERS: &[(BlockKind, &[&str])] = &[
    (
        BlockKind::RateLimit,
        &[
            ".limit-reached",
            ".search-limit",
            ".limit-hit",
            "[data-test-limit-reached]",
        ],
    ),
    (
        BlockKind::SecurityCheck,
        &[
            ".challenge",
            ".captcha-container",
            "#captcha",
            ".security-verification",
            "[data-test-security-check]",
        ],
    ),
    (
        BlockKind::LoginRequired,
        &[
            ".login-form",
            ".join-form",
            ".sign-in-card",
            "[data-test-login-required]",
        ],
    ),
    (
        BlockKind::AccountRestricted,
        &[
            ".restricted-account",
            ".account-suspended",
            "[data-test-account-restricted]",
        ],
    ),
    (
        BlockKind::NotFound,
        &[
            ".not-found",
            ".error-404",
            "[data-test-404]",
            ".page-not-found",
        ],
    ),
    (
        BlockKind::PrivateProfile,
        &[
            ".private-profile",
            ".out-of-network",
            "[data-test-private-profile]",
        ],
    ),
    (
        BlockKind::IpBlock,
        &[".ip-restricted", ".too-many-requests", "[data-test-ip-block]"],
    ),
];

/// URL fragments per kind. `{domain}` is replaced by the profile domain.
const URL_MARKERS: &[(BlockKind, &[&str])] = &[
    (
        BlockKind::SecurityCheck,
        &["checkpoint/challenge", "security/check", "captcha"],
    ),
    (
        BlockKind::LoginRequired,
        &["{domain}/login", "{domain}/checkpoint"],
    ),
    (
        BlockKind::AccountRestricted,
        &["{domain}/checkpoint/restricted", "{domain}/suspended"],
    ),
    (BlockKind::NotFound, &["{domain}/404", "{domain}/pub/error"]),
];

/// Elements whose text is collected as error messages.
const ERROR_MESSAGE_SELECTORS: &str =
    ".error-message, .alert-error, .alert-warning, .notification-text, .message-body";

static COMPILED_TEXT_PATTERNS: Lazy<Vec<(BlockKind, Vec<Regex>)>> = Lazy::new(|| {
    TEXT_PATTERNS
        .iter()
        .map(|(kind, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(&format!("(?i){p}")).expect("valid regex"))
                .collect();
            (*kind, compiled)
        })
        .collect()
});

static COMPILED_CSS_MARKERS: Lazy<Vec<(BlockKind, Vec<Selector>)>> = Lazy::new(|| {
    CSS_MARKERS
        .iter()
        .map(|(kind, selectors)| {
            let compiled = selectors
                .iter()
                .map(|s| Selector::parse(s).expect("valid selector"))
                .collect();
            (*kind, compiled)
        })
        .collect()
});

static ERROR_MESSAGES: Lazy<Selector> =
    Lazy::new(|| Selector::parse(ERROR_MESSAGE_SELECTORS).expect("valid selector"));

static WAIT_TIME_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)try\s+again\s+in\s+(\d+)\s+(minutes?|hours?|days?)").expect("valid regex"),
        Regex::new(r"(?i)tente\s+novamente\s+em\s+(\d+)\s+(minutos?|horas?|dias?)")
            .expect("valid regex"),
    ]
});

/// Classifies fetched pages for one profile domain.
#[derive(Debug, Clone)]
pub struct BlockDetector {
    url_markers: Vec<(BlockKind, Vec<String>)>,
    login_redirect: String,
    checkpoint_redirect: String,
}

impl BlockDetector {
    /// Create a detector for pages served from `profile_domain`.
    #[must_use]
    pub fn new(profile_domain: &str) -> Self {
        let domain = profile_domain.trim().to_lowercase();
        let url_markers = URL_MARKERS
            .iter()
            .map(|(kind, markers)| {
                let markers = markers
                    .iter()
                    .map(|m| m.replace("{domain}", &domain))
                    .collect();
                (*kind, markers)
            })
            .collect();

        Self {
            url_markers,
            login_redirect: format!("{domain}/login"),
            checkpoint_redirect: format!("{domain}/checkpoint"),
        }
    }

    /// Classify a page from its HTML and final URL.
    #[must_use]
    pub fn detect(&self, html: &str, url: &str) -> BlockDetectionResult {
        let document = Html::parse_document(html);
        let text = visible_text(&document);
        let url = url.to_lowercase();
        let mut block_types = BTreeSet::new();

        for (kind, patterns) in COMPILED_TEXT_PATTERNS.iter() {
            if patterns.iter().any(|p| p.is_match(&text)) {
                block_types.insert(*kind);
            }
        }

        for (kind, selectors) in COMPILED_CSS_MARKERS.iter() {
            if selectors.iter().any(|s| document.select(s).next().is_some()) {
                block_types.insert(*kind);
            }
        }

        for (kind, markers) in &self.url_markers {
            if markers.iter().any(|m| url.contains(m.as_str())) {
                block_types.insert(*kind);
            }
        }

        if url.contains(&self.login_redirect) {
            block_types.insert(BlockKind::LoginRequired);
        }
        if url.contains(&self.checkpoint_redirect) {
            block_types.insert(BlockKind::SecurityCheck);
        }

        let error_messages = error_messages(&document);
        let wait_time = if block_types.contains(&BlockKind::RateLimit) {
            parse_wait_time(&error_messages)
        } else {
            None
        };

        BlockDetectionResult {
            is_blocked: !block_types.is_empty(),
            block_types,
            details: BlockDetails {
                error_messages,
                wait_time,
            },
        }
    }

    /// Map a detection result to one action. The most severe kind wins.
    #[must_use]
    pub fn recommended_action(result: &BlockDetectionResult) -> RecommendedAction {
        use BlockKind as K;
        use RecoveryAction as A;

        if !result.is_blocked {
            return RecommendedAction::new(A::Continue, None, "No block detected.", 0);
        }

        if result.has(K::AccountRestricted) {
            return RecommendedAction::new(
                A::Stop,
                Some(K::AccountRestricted),
                "Account restricted. Check the account manually.",
                86_400,
            );
        }
        if result.has(K::IpBlock) {
            return RecommendedAction::new(
                A::ChangeProxy,
                Some(K::IpBlock),
                "IP address blocked. Switch proxy before continuing.",
                3_600,
            );
        }
        if result.has(K::SecurityCheck) {
            return RecommendedAction::new(
                A::ManualIntervention,
                Some(K::SecurityCheck),
                "Security verification detected. Manual intervention required.",
                1_800,
            );
        }
        if result.has(K::RateLimit) {
            let wait = result
                .details
                .wait_time
                .map_or(3_600, |w| w.as_duration().as_secs());
            return RecommendedAction::new(
                A::Wait,
                Some(K::RateLimit),
                "Rate limit reached. Wait before continuing.",
                wait,
            );
        }
        if result.has(K::LoginRequired) {
            return RecommendedAction::new(
                A::Login,
                Some(K::LoginRequired),
                "Login required. Sign in again.",
                0,
            );
        }
        if result.has(K::NotFound) {
            return RecommendedAction::new(
                A::Skip,
                Some(K::NotFound),
                "Page not found. Skip this profile.",
                0,
            );
        }
        if result.has(K::PrivateProfile) {
            return RecommendedAction::new(
                A::Skip,
                Some(K::PrivateProfile),
                "Private or out-of-network profile. Skip this profile.",
                0,
            );
        }

        RecommendedAction::new(
            A::Wait,
            None,
            "Unknown block detected. Wait before continuing.",
            1_800,
        )
    }
}

/// Visible text of a document: script and style bodies dropped, whitespace
/// collapsed, lower-cased, typographic apostrophes folded to `'`.
fn visible_text(document: &Html) -> String {
    let mut parts = Vec::new();
    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|element| matches!(element.name(), "script" | "style" | "noscript"));
        if !hidden {
            parts.push(&**text);
        }
    }

    parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\u{2019}', "'")
        .to_lowercase()
}

fn error_messages(document: &Html) -> Vec<String> {
    document
        .select(&ERROR_MESSAGES)
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|message| !message.is_empty())
        .collect()
}

fn parse_wait_time(messages: &[String]) -> Option<WaitTime> {
    WAIT_TIME_PATTERNS.iter().find_map(|pattern| {
        messages.iter().find_map(|message| {
            let captures = pattern.captures(message)?;
            let value = captures.get(1)?.as_str().parse().ok()?;
            let unit = WaitUnit::parse(captures.get(2)?.as_str())?;
            Some(WaitTime { value, unit })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_URL: &str = "https://www.linkedin.com/in/jane-doe";

    fn detector() -> BlockDetector {
        BlockDetector::new("linkedin.com")
    }

    fn kinds(result: &BlockDetectionResult) -> Vec<BlockKind> {
        result.block_types.iter().copied().collect()
    }

    #[test]
    fn test_pattern_tables_compile() {
        assert_eq!(COMPILED_TEXT_PATTERNS.len(), 7);
        assert_eq!(COMPILED_CSS_MARKERS.len(), 7);
        assert_eq!(WAIT_TIME_PATTERNS.len(), 2);
    }

    #[test]
    fn test_clean_page_is_not_blocked() {
        let html = "<html><body><h1>Jane Doe</h1><p>Engineer at Acme</p></body></html>";
        let result = detector().detect(html, PROFILE_URL);

        assert!(!result.is_blocked);
        assert!(result.block_types.is_empty());
        let action = BlockDetector::recommended_action(&result);
        assert_eq!(action.action, RecoveryAction::Continue);
        assert_eq!(action.wait, Duration::ZERO);
    }

    #[test]
    fn test_login_text_detects_exactly_login_required() {
        let result = detector().detect("Please log in to continue", PROFILE_URL);

        assert!(result.is_blocked);
        assert_eq!(kinds(&result), vec![BlockKind::LoginRequired]);
        assert_eq!(
            BlockDetector::recommended_action(&result).action,
            RecoveryAction::Login
        );
    }

    #[test]
    fn test_portuguese_patterns() {
        let html = "<p>Página não encontrada</p>";
        let result = detector().detect(html, PROFILE_URL);
        assert_eq!(kinds(&result), vec![BlockKind::NotFound]);
    }

    #[test]
    fn test_script_text_is_ignored() {
        let html = "<html><body><script>var captcha = true;</script><p>Hello</p></body></html>";
        let result = detector().detect(html, PROFILE_URL);
        assert!(!result.is_blocked);
    }

    #[test]
    fn test_typographic_apostrophe_matches() {
        let result = detector().detect("<p>You\u{2019}ve reached the weekly limit</p>", PROFILE_URL);
        assert!(result.has(BlockKind::RateLimit));
    }

    #[test]
    fn test_css_markers() {
        let html = r#"<div class="captcha-container"></div>"#;
        let result = detector().detect(html, PROFILE_URL);
        assert_eq!(kinds(&result), vec![BlockKind::SecurityCheck]);

        let html = r"<section data-test-private-profile></section>";
        let result = detector().detect(html, PROFILE_URL);
        assert_eq!(kinds(&result), vec![BlockKind::PrivateProfile]);
    }

    #[test]
    fn test_url_markers_and_redirects() {
        let result = detector().detect("", "https://www.linkedin.com/login?session_redirect=x");
        assert_eq!(kinds(&result), vec![BlockKind::LoginRequired]);

        let result = detector().detect("", "https://www.linkedin.com/checkpoint/challenge/abc");
        assert!(result.has(BlockKind::SecurityCheck));
        assert!(result.has(BlockKind::LoginRequired));
        assert_eq!(
            BlockDetector::recommended_action(&result).action,
            RecoveryAction::ManualIntervention
        );
    }

    #[test]
    fn test_url_markers_follow_profile_domain() {
        let detector = BlockDetector::new("example.org");
        let result = detector.detect("", "https://www.example.org/404");
        assert_eq!(kinds(&result), vec![BlockKind::NotFound]);

        let result = detector.detect("", "https://www.linkedin.com/404");
        assert!(!result.is_blocked);
    }

    #[test]
    fn test_account_restriction_dominates_rate_limit() {
        let html = "<p>Your account has been restricted.</p><p>Try again later.</p>";
        let result = detector().detect(html, PROFILE_URL);

        assert!(result.has(BlockKind::AccountRestricted));
        assert!(result.has(BlockKind::RateLimit));
        let action = BlockDetector::recommended_action(&result);
        assert_eq!(action.action, RecoveryAction::Stop);
        assert_eq!(action.reason, Some(BlockKind::AccountRestricted));
        assert_eq!(action.wait, Duration::from_secs(86_400));
        assert!(action.action.is_fatal());
    }

    #[test]
    fn test_rate_limit_wait_time_is_parsed() {
        let html = r#"<div class="alert-warning">
            You've reached the weekly limit. Try again in 2 hours.
        </div>"#;
        let result = detector().detect(html, PROFILE_URL);

        assert_eq!(
            result.details.wait_time,
            Some(WaitTime {
                value: 2,
                unit: WaitUnit::Hours
            })
        );
        let action = BlockDetector::recommended_action(&result);
        assert_eq!(action.action, RecoveryAction::Wait);
        assert_eq!(action.wait, Duration::from_secs(7_200));
    }

    #[test]
    fn test_portuguese_wait_units() {
        let html = r#"<p class="error-message">Tente novamente mais tarde. Tente novamente em 15 minutos.</p>"#;
        let result = detector().detect(html, PROFILE_URL);

        assert_eq!(
            result.details.wait_time,
            Some(WaitTime {
                value: 15,
                unit: WaitUnit::Minutes
            })
        );
        assert_eq!(
            BlockDetector::recommended_action(&result).wait,
            Duration::from_secs(900)
        );
    }

    #[test]
    fn test_rate_limit_without_wait_defaults_to_one_hour() {
        let result = detector().detect("<p>Try again later</p>", PROFILE_URL);
        assert!(result.details.wait_time.is_none());
        assert_eq!(
            BlockDetector::recommended_action(&result).wait,
            Duration::from_secs(3_600)
        );
    }

    #[test]
    fn test_priority_table() {
        let cases = [
            (vec![BlockKind::IpBlock, BlockKind::SecurityCheck], RecoveryAction::ChangeProxy),
            (vec![BlockKind::SecurityCheck, BlockKind::RateLimit], RecoveryAction::ManualIntervention),
            (vec![BlockKind::RateLimit, BlockKind::LoginRequired], RecoveryAction::Wait),
            (vec![BlockKind::LoginRequired, BlockKind::NotFound], RecoveryAction::Login),
            (vec![BlockKind::NotFound, BlockKind::PrivateProfile], RecoveryAction::Skip),
            (vec![BlockKind::PrivateProfile], RecoveryAction::Skip),
        ];

        for (detected, expected) in cases {
            let result = BlockDetectionResult {
                is_blocked: true,
                block_types: detected.into_iter().collect(),
                details: BlockDetails::default(),
            };
            assert_eq!(BlockDetector::recommended_action(&result).action, expected);
        }
    }

    #[test]
    fn test_blocked_without_kind_waits_thirty_minutes() {
        let result = BlockDetectionResult {
            is_blocked: true,
            ..BlockDetectionResult::default()
        };
        let action = BlockDetector::recommended_action(&result);
        assert_eq!(action.action, RecoveryAction::Wait);
        assert_eq!(action.reason, None);
        assert_eq!(action.wait, Duration::from_secs(1_800));
    }

    #[test]
    fn test_error_messages_are_collected() {
        let html = r#"<div class="notification-text">  Something
            went wrong </div><div class="message-body"></div>"#;
        let result = detector().detect(html, PROFILE_URL);
        assert_eq!(result.details.error_messages, vec!["Something went wrong"]);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&BlockKind::AccountRestricted).expect("serialize");
        assert_eq!(json, "\"account_restricted\"");
        assert_eq!(RecoveryAction::ChangeProxy.to_string(), "change_proxy");
    }
}
