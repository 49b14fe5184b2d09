//! Query pipeline: one question against one ingested file

use std::sync::Arc;
use std::time::Duration;

use tabrag_core::{Embedder, Generator, ResponseCache, Result, VectorStore};

use crate::config::PipelineConfig;
use crate::rank;

/// Cache key scoped to the file filter, so identical questions against
/// different files never collide.
pub fn cache_key(source_file: &str, query: &str) -> String {
    format!("{}::{}", source_file, query)
}

/// Answers questions by retrieving matching rows and asking the
/// generation model to synthesize a response.
///
/// Stateless per request; the cache is the only cross-request state and
/// it is strictly best-effort.
pub struct QueryPipeline<E: Embedder, V: VectorStore, C: ResponseCache, G: Generator> {
    embedder: Arc<E>,
    store: Arc<V>,
    cache: Arc<C>,
    generator: Arc<G>,
    top_k: usize,
    rerank_limit: usize,
    cache_ttl: Duration,
}

impl<E: Embedder, V: VectorStore, C: ResponseCache, G: Generator> QueryPipeline<E, V, C, G> {
    pub fn new(
        embedder: Arc<E>,
        store: Arc<V>,
        cache: Arc<C>,
        generator: Arc<G>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            cache,
            generator,
            top_k: config.top_k,
            rerank_limit: config.rerank_limit,
            cache_ttl: config.cache_ttl(),
        }
    }

    /// Answer `query` using rows previously ingested from `source_file`.
    pub async fn answer(&self, query: &str, source_file: &str) -> Result<String> {
        match self.run(query, source_file).await {
            Ok(answer) => Ok(answer),
            Err(err) => {
                tracing::error!(source_file, error = %err, "query failed");
                Err(err)
            }
        }
    }

    async fn run(&self, query: &str, source_file: &str) -> Result<String> {
        let key = cache_key(source_file, query);

        if let Some(cached) = self.cache_get(&key).await {
            tracing::debug!(source_file, "answer served from cache");
            return Ok(cached);
        }

        let vector = self.embedder.embed(query).await?;
        let hits = self
            .store
            .search(vector, Some(source_file), self.top_k)
            .await?;

        let ranked = rank::rank(hits, self.rerank_limit);
        tracing::debug!(source_file, hits = ranked.len(), "retrieved context rows");

        let context: Vec<String> = ranked.into_iter().map(|hit| hit.payload.text).collect();
        let answer = self.generator.generate(&context, query).await?;

        self.cache_put(&key, &answer).await;

        Ok(answer)
    }

    async fn cache_get(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    async fn cache_put(&self, key: &str, answer: &str) {
        if let Err(err) = self.cache.set(key, answer, self.cache_ttl).await {
            tracing::warn!(error = %err, "cache write failed, answer not cached");
        }
    }
}
