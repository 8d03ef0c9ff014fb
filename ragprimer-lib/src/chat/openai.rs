use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat::{ChatModel, Message};
use crate::openai::{build_client, endpoint, error_message, DEFAULT_BASE_URL};
use crate::{Error, Result};

/// Configuration for [`OpenAiChat`]
#[derive(Debug, Clone)]
pub struct OpenAiChatConfig {
    /// API root, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// API key; falls back to `OPENAI_API_KEY`
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat model backed by an OpenAI-compatible `/chat/completions` API.
pub struct OpenAiChat {
    client: Client,
    config: OpenAiChatConfig,
}

impl OpenAiChat {
    pub fn new(config: OpenAiChatConfig) -> Result<Self> {
        let client = build_client(&config.base_url, config.api_key.as_deref(), config.timeout_secs)
            .map_err(Error::Chat)?;
        Ok(Self { client, config })
    }
}

fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::Chat(format!("invalid completion response: {e}")))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| Error::Chat("missing choices[0].message.content".to_string()))
}

impl ChatModel for OpenAiChat {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn complete(&mut self, messages: &[Message]) -> Result<String> {
        let url = endpoint(&self.config.base_url, "chat/completions");
        debug!(
            %url,
            model = %self.config.model,
            messages = messages.len(),
            "requesting completion"
        );

        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| Error::Chat(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::Chat(format!("failed to read response: {e}")))?;
        if !status.is_success() {
            return Err(Error::Chat(error_message(status.as_u16(), &body)));
        }

        parse_completion(&body)
    }
}
