//! Pipeline tuning configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tabrag_core::{Error, Result};

/// Tuning knobs shared by the ingestion and query pipelines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Neighbors requested from the vector store per query
    pub top_k: usize,
    /// Rows kept as generation context after re-ranking
    pub rerank_limit: usize,
    /// Concurrent embedding requests during one ingestion run
    pub embed_fan_out: usize,
    /// Lifetime of cached answers, in seconds
    pub cache_ttl_secs: u64,
}

impl PipelineConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            top_k: read_var("TOP_K", 5)?,
            rerank_limit: read_var("RERANK_LIMIT", 5)?,
            embed_fan_out: read_var("EMBED_FAN_OUT", 8)?,
            cache_ttl_secs: match env::var("CACHE_TTL_SECS").or_else(|_| env::var("REDIS_TTL")) {
                Ok(raw) => raw.parse().map_err(|_| {
                    Error::Configuration(format!(
                        "CACHE_TTL_SECS must be an integer, got '{}'",
                        raw
                    ))
                })?,
                Err(_) => 3600,
            },
        };

        if config.embed_fan_out == 0 {
            return Err(Error::Configuration(
                "EMBED_FAN_OUT must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            rerank_limit: 5,
            embed_fan_out: 8,
            cache_ttl_secs: 3600,
        }
    }
}

fn read_var(name: &str, default: usize) -> Result<usize> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            Error::Configuration(format!("{} must be an integer, got '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_default_tuning_snapshot() {
        assert_yaml_snapshot!(PipelineConfig::default(), @r###"
        ---
        top_k: 5
        rerank_limit: 5
        embed_fan_out: 8
        cache_ttl_secs: 3600
        "###);
    }

    #[test]
    fn test_cache_ttl_converts_seconds() {
        let config = PipelineConfig {
            cache_ttl_secs: 90,
            ..PipelineConfig::default()
        };
        assert_eq!(config.cache_ttl(), Duration::from_secs(90));
    }
}
