//! Qdrant configuration

use serde::{Deserialize, Serialize};
use std::env;
use tabrag_core::{Error, Result};

/// Configuration for the Qdrant vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// gRPC endpoint of the Qdrant server
    pub url: String,
    pub collection: String,
    /// Vector dimension the collection is created with. Must match the
    /// embedding model's output.
    pub dimension: u64,
    pub timeout_secs: u64,
}

impl QdrantConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let url =
            env::var("QDRANT_URL").unwrap_or_else(|_| "http://localhost:6334".to_string());

        let collection =
            env::var("QDRANT_COLLECTION").unwrap_or_else(|_| "dataset_embeddings".to_string());

        let dimension = match env::var("EMBEDDING_DIMENSION") {
            Ok(raw) => raw.parse().map_err(|_| {
                Error::Configuration(format!(
                    "EMBEDDING_DIMENSION must be an integer, got '{}'",
                    raw
                ))
            })?,
            Err(_) => 768,
        };

        let timeout_secs = match env::var("QDRANT_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                Error::Configuration(format!(
                    "QDRANT_TIMEOUT_SECS must be an integer, got '{}'",
                    raw
                ))
            })?,
            Err(_) => 30,
        };

        Ok(Self {
            url,
            collection,
            dimension,
            timeout_secs,
        })
    }

    /// Create configuration with an explicit endpoint and defaults
    pub fn new(url: String, collection: String) -> Self {
        Self {
            url,
            collection,
            dimension: 768,
            timeout_secs: 30,
        }
    }
}
