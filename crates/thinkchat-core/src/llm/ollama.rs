use crate::constants::{defaults, endpoints};
use crate::error::ChatError;
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};

/// Client for a local Ollama server, talking to `/api/chat` with streaming off.
pub struct OllamaClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.into(),
            base_url: endpoints::OLLAMA_BASE_URL.to_string(),
            temperature: defaults::TEMPERATURE,
            max_tokens: defaults::MAX_TOKENS,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn chat_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            endpoints::OLLAMA_CHAT_PATH
        )
    }

    fn build_request<'a>(&'a self, messages: &'a [Message]) -> OllamaChatRequest<'a> {
        OllamaChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse, ChatError> {
        let url = self.chat_url();
        tracing::debug!(%url, model = %self.model, messages = messages.len(), "Ollama chat request");

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(messages))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::Llm(format!(
                "Ollama API error ({}): {}",
                status, response_text
            )));
        }

        let api_response: OllamaChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| ChatError::Llm(format!("Failed to parse response: {e}")))?;

        let content = api_response
            .message
            .map(|m| m.content)
            .ok_or_else(|| ChatError::llm("No message in Ollama response"))?;

        let usage = match (api_response.prompt_eval_count, api_response.eval_count) {
            (Some(input_tokens), Some(output_tokens)) => Some(Usage {
                input_tokens,
                output_tokens,
            }),
            _ => None,
        };

        Ok(LlmResponse {
            message: Message::assistant(content),
            usage,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
