//! Cohere text generation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{TextGenerator, UpstreamError};
use crate::config::GenerationConfig;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    text: String,
}

/// Client for Cohere's generate endpoint
pub struct CohereGenerator {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    timeout: Duration,
}

impl CohereGenerator {
    pub fn new(api_key: String, config: &GenerationConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout,
        }
    }
}

#[async_trait]
impl TextGenerator for CohereGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!("Requesting generation from {} ({})", self.endpoint, self.model);

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout(self.timeout)
                } else {
                    UpstreamError::Http(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("Text generation failed with status {}", status);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        parsed
            .generations
            .into_iter()
            .next()
            .map(|g| g.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(UpstreamError::Empty)
    }
}
