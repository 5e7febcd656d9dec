use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{defaults, endpoints, models};
use crate::context::{system_instruction, PromptAssembler};
use crate::error::ChatError;
use crate::llm::{LlmClient, ModelInvoker, OllamaClient};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub chat: ChatSettings,
}

/// Model invocation parameters. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelSettings {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatSettings {
    /// Replaces the built-in persona when set.
    pub system_prompt: Option<String>,
    /// Most recent turns injected into each prompt. `None` sends all of them.
    pub max_history_turns: Option<usize>,
    pub clean_output_by_default: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: models::DEFAULT_MODEL.to_string(),
            base_url: endpoints::OLLAMA_BASE_URL.to_string(),
            temperature: defaults::TEMPERATURE,
            max_tokens: defaults::MAX_TOKENS,
            timeout_secs: defaults::INVOCATION_TIMEOUT_SECS,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            system_prompt: None,
            max_history_turns: None,
            clean_output_by_default: defaults::CLEAN_OUTPUT,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("thinkchat")
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    "Ignoring unreadable config, using defaults: {}",
                    e
                );
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ChatError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ChatError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ChatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        let model = &self.model;
        if model.model.trim().is_empty() {
            return Err(ChatError::Config("model name must not be empty".into()));
        }
        if model.base_url.trim().is_empty() {
            return Err(ChatError::Config("base_url must not be empty".into()));
        }
        if !(0.0..=defaults::MAX_TEMPERATURE).contains(&model.temperature) {
            return Err(ChatError::Config(format!(
                "temperature must be between 0.0 and {}, got {}",
                defaults::MAX_TEMPERATURE,
                model.temperature
            )));
        }
        if model.max_tokens == 0 {
            return Err(ChatError::Config("max_tokens must be greater than 0".into()));
        }
        if model.timeout_secs == 0 {
            return Err(ChatError::Config("timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }

    pub fn invocation_timeout(&self) -> Duration {
        Duration::from_secs(self.model.timeout_secs)
    }

    /// Build an LLM client from the current settings.
    pub fn build_llm_client(&self) -> Arc<dyn LlmClient> {
        Arc::new(
            OllamaClient::new(self.model.model.clone())
                .with_base_url(self.model.base_url.clone())
                .with_temperature(self.model.temperature)
                .with_max_tokens(self.model.max_tokens),
        )
    }

    pub fn build_invoker(&self) -> ModelInvoker {
        ModelInvoker::new(self.build_llm_client()).with_timeout(self.invocation_timeout())
    }

    pub fn build_assembler(&self) -> PromptAssembler {
        PromptAssembler::new()
            .with_system_instruction(system_instruction(self.chat.system_prompt.as_deref()))
            .with_history_window(self.chat.max_history_turns)
    }
}
