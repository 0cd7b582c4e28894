use async_trait::async_trait;
use reqwest::header;
use tracing::{debug, instrument};

use crate::config::GeminiConfig;

mod api;

use api::{GenerateContentRequest, GenerateContentResponse};

/// A client for a generative-text model. Injected into request handlers so
/// tests can substitute a canned implementation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends a single-turn prompt and returns the model's plain-text reply.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse()?);
        headers.insert("x-goog-api-key", config.api_key.parse()?);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(GeminiClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateContentRequest::single_turn(prompt);

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("generation request failed with status {status}: {body}");
        }

        let response: GenerateContentResponse = response.json().await?;
        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| anyhow::anyhow!("generation response contained no candidates"))?;

        let text = candidate.content.text();
        debug!(chars = text.len(), "generation response received");
        Ok(text)
    }
}
