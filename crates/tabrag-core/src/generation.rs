//! Text generation abstraction

use async_trait::async_trait;

use crate::Result;

/// Language model service that synthesizes an answer from retrieved rows.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer to `query` grounded in `context`, one retrieved
    /// row text per entry in ranked order.
    async fn generate(&self, context: &[String], query: &str) -> Result<String>;
}
