use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Model invocation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ChatError {
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// True for every error a model call can produce. The session layer
    /// treats all of these as one generic "invocation failed" condition.
    pub fn is_invocation_failure(&self) -> bool {
        matches!(
            self,
            Self::Llm(_) | Self::Timeout(_) | Self::Http(_) | Self::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
