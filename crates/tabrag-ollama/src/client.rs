//! Ollama client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use tabrag_core::{Embedder, Error, Generator, Result};

use crate::config::OllamaConfig;

/// Instructions sent with every generation request. The answer style is
/// tuned for review analysis: summary sentence first, CommonMark, no
/// boilerplate openings.
const SYSTEM_PROMPT: &str = "You are a helpful AI assistant designed to analyze user reviews and provide structured, natural-sounding responses.

When answering, follow these guidelines:
- Avoid generic openings like \"Based on the provided information...\"
- Provide **direct and concise answers** without unnecessary disclaimers.
- Strictly follow CommonMark format.
- Use bullet points or numbered lists for multiple points.
- Summarize the response in **one clear sentence first**, then expand with details.";

/// Ollama client backing both the embedding and generation traits
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct VersionResponse {
    version: String,
}

/// Number the context rows and append them under the question.
pub(crate) fn build_prompt(context: &[String], query: &str) -> String {
    let context_text = context
        .iter()
        .enumerate()
        .map(|(index, text)| format!("{}. {}", index + 1, text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Based on the reviews below, answer the question: {}\n\nReviews:\n{}",
        query, context_text
    )
}

impl OllamaClient {
    /// Create a new Ollama client from configuration
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new Ollama client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OllamaConfig::from_env()?;
        Self::new(config)
    }

    /// Model used for embedding requests
    pub fn embedding_model(&self) -> &str {
        &self.config.embedding_model
    }

    /// Model used for generation requests
    pub fn generation_model(&self) -> &str {
        &self.config.generation_model
    }

    /// Report the server version, used as a reachability probe.
    pub async fn version(&self) -> Result<String> {
        let url = format!("{}/api/version", self.config.api_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Ollama is unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Generation(format!(
                "Ollama version check failed with status {}",
                response.status()
            )));
        }

        let payload: VersionResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;

        Ok(payload.version)
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embed", self.config.api_url);

        let request = EmbedRequest {
            model: &self.config.embedding_model,
            input: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout("embedding request timed out".to_string())
                } else {
                    Error::Embedding(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Embedding(format!(
                "Ollama embed request failed with status {}: {}",
                status, error_text
            )));
        }

        let payload: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;

        // The API returns a batch of embeddings even for one input
        payload
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("no embedding returned for input".to_string()))
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, context: &[String], query: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.api_url);
        let prompt = build_prompt(context, query);

        let request = GenerateRequest {
            model: &self.config.generation_model,
            prompt: &prompt,
            system: SYSTEM_PROMPT,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout("generation request timed out".to_string())
                } else {
                    Error::Generation(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Generation(format!(
                "Ollama generate request failed with status {}: {}",
                status, error_text
            )));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;

        if payload.response.trim().is_empty() {
            return Err(Error::Generation(
                "model returned an empty response".to_string(),
            ));
        }

        Ok(payload.response)
    }
}
