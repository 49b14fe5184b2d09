//! Embedding client abstraction

use async_trait::async_trait;

use crate::Result;

/// Turns text into a fixed-dimension vector via an external model service.
///
/// Implementations must be safe to share across tasks; the pipelines fan
/// out concurrent `embed` calls against a single instance.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text. The returned vector length is the model's
    /// dimension; callers validate it against the configured collection.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
