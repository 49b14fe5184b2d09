//! Vector store abstraction

use async_trait::async_trait;

use crate::unit::{SearchHit, VectorRecord};
use crate::Result;

/// A named collection of (vector, payload) records with similarity search.
///
/// Implementations are constructed with their collection name and vector
/// dimension; records are insert-only and survive process restarts when
/// the backing store is durable.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection with the configured dimension and cosine
    /// distance if it does not exist yet. Idempotent.
    async fn ensure_collection(&self) -> Result<()>;

    /// Insert a batch of records in a single call. Either the whole batch
    /// is accepted or the call fails.
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<()>;

    /// Return up to `limit` nearest neighbors of `vector` ordered by
    /// descending similarity, restricted to records whose payload
    /// `source_file` matches when a filter is given.
    async fn search(
        &self,
        vector: Vec<f32>,
        source_file: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchHit>>;
}
