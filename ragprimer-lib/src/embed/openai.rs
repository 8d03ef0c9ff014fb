use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embed::{Embedder, Embedding};
use crate::openai::{build_client, endpoint, error_message, DEFAULT_BASE_URL};
use crate::{Error, Result};

/// Configuration for [`OpenAiEmbedder`]
#[derive(Debug, Clone)]
pub struct OpenAiEmbedderConfig {
    /// API root, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// API key; falls back to `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// Model name (e.g., "text-embedding-3-small")
    pub model: String,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of inputs per request
    pub max_batch_size: usize,
}

impl Default for OpenAiEmbedderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            timeout_secs: 30,
            max_batch_size: 100,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    encoding_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// Embedder backed by an OpenAI-compatible embeddings API.
pub struct OpenAiEmbedder {
    client: Client,
    config: OpenAiEmbedderConfig,
}

impl OpenAiEmbedder {
    pub fn new(config: OpenAiEmbedderConfig) -> Result<Self> {
        if config.max_batch_size == 0 {
            return Err(Error::InvalidArgument(
                "max_batch_size must be greater than zero".to_string(),
            ));
        }
        let client = build_client(&config.base_url, config.api_key.as_deref(), config.timeout_secs)
            .map_err(Error::Embedding)?;
        Ok(Self { client, config })
    }

    fn request(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let url = endpoint(&self.config.base_url, "embeddings");
        debug!(%url, inputs = texts.len(), "requesting embeddings");

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
            encoding_format: "float",
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| Error::Embedding(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::Embedding(format!("failed to read response: {e}")))?;
        if !status.is_success() {
            return Err(Error::Embedding(error_message(status.as_u16(), &body)));
        }

        parse_embeddings(&body, texts.len())
    }
}

/// Decode a response body, restoring input order from each item's `index`.
fn parse_embeddings(body: &str, expected: usize) -> Result<Vec<Embedding>> {
    let response: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| Error::Embedding(format!("invalid embeddings response: {e}")))?;

    if response.data.len() != expected {
        return Err(Error::Embedding(format!(
            "expected {expected} embeddings, got {}",
            response.data.len()
        )));
    }

    // each index in 0..expected exactly once
    let mut slots: Vec<Option<Embedding>> = vec![None; expected];
    for item in response.data {
        match slots.get_mut(item.index) {
            Some(slot @ None) => *slot = Some(item.embedding),
            Some(Some(_)) => {
                return Err(Error::Embedding(format!(
                    "duplicate embedding index {}",
                    item.index
                )))
            }
            None => {
                return Err(Error::Embedding(format!(
                    "embedding index {} out of range for {expected} inputs",
                    item.index
                )))
            }
        }
    }
    Ok(slots.into_iter().flatten().collect())
}

impl Embedder for OpenAiEmbedder {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.config.dimensions
    }

    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.config.max_batch_size) {
            embeddings.extend(self.request(batch)?);
        }
        Ok(embeddings)
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        self.request(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("API returned no embeddings".to_string()))
    }
}
