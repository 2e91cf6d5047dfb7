use crate::block::{BlockKind, RecoveryAction};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HuntError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("page blocked ({action}): {message}")]
    Blocked {
        kind: Option<BlockKind>,
        action: RecoveryAction,
        message: String,
    },

    #[error("profile unavailable: {kind}")]
    ProfileUnavailable { kind: BlockKind },

    #[error("invalid profile URL: {0}")]
    InvalidProfileUrl(String),

    #[error("scraping failed: {0}")]
    Scraping(String),

    #[error("browser error: {0}")]
    Browser(#[from] hunter_browser::BrowserError),

    #[error("LLM error: {0}")]
    Llm(#[from] hunter_llm::LlmError),

    #[error("configuration error: {0}")]
    Config(#[from] hunter_core::ConfigError),
}

impl HuntError {
    /// A block the recovery layer gave up on (`Stop` or `ManualIntervention`).
    #[must_use]
    pub fn is_fatal_block(&self) -> bool {
        matches!(self, Self::Blocked { action, .. } if action.is_fatal())
    }
}

pub type Result<T> = std::result::Result<T, HuntError>;
