use std::sync::Arc;
use std::time::Duration;

use crate::constants::defaults;
use crate::context::PromptContext;
use crate::error::{ChatError, Result};
use crate::llm::LlmClient;

/// Runs one assembled prompt against the model endpoint.
///
/// Model, endpoint, temperature and token budget are fixed inside the client
/// at construction; nothing here can be changed per turn. Every call is
/// bounded by `timeout`.
#[derive(Clone)]
pub struct ModelInvoker {
    client: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl ModelInvoker {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(defaults::INVOCATION_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Send the prompt and return the raw generated text.
    pub async fn invoke(&self, prompt: &PromptContext) -> Result<String> {
        let messages = prompt.to_messages();
        tracing::debug!(
            model = self.client.model(),
            messages = messages.len(),
            prompt = %prompt.render(),
            "Invoking model"
        );

        let response = tokio::time::timeout(self.timeout, self.client.chat(&messages))
            .await
            .map_err(|_| ChatError::Timeout(self.timeout))??;

        if let Some(usage) = response.usage {
            tracing::debug!(
                model = self.client.model(),
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Model invocation complete"
            );
        }

        Ok(response.message.content)
    }
}
