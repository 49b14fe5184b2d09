//! Ollama configuration

use serde::{Deserialize, Serialize};
use std::env;
use tabrag_core::{Error, Result};

/// Configuration for the Ollama client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub api_url: String,
    pub generation_model: String,
    pub embedding_model: String,
    pub timeout_secs: u64,
}

impl OllamaConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = env::var("OLLAMA_API_URL")
            .or_else(|_| env::var("OLLAMA_API"))
            .unwrap_or_else(|_| "http://localhost:11434".to_string());

        let generation_model = env::var("OLLAMA_GENERATION_MODEL")
            .or_else(|_| env::var("OLLAMA_MODEL"))
            .unwrap_or_else(|_| "qwen:7b".to_string());

        let embedding_model = env::var("OLLAMA_EMBEDDING_MODEL")
            .or_else(|_| env::var("EMBEDDING_MODEL"))
            .unwrap_or_else(|_| "nomic-embed-text".to_string());

        let timeout_secs = match env::var("OLLAMA_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                Error::Configuration(format!(
                    "OLLAMA_TIMEOUT_SECS must be an integer, got '{}'",
                    raw
                ))
            })?,
            Err(_) => 60,
        };

        Ok(Self {
            api_url,
            generation_model,
            embedding_model,
            timeout_secs,
        })
    }

    /// Create configuration with an explicit endpoint and default models
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            generation_model: "qwen:7b".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            timeout_secs: 60,
        }
    }
}
