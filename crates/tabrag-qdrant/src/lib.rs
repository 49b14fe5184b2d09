//! Qdrant integration for tabrag
//!
//! This crate provides the Qdrant implementation of the VectorStore trait
//! over the gRPC client, including collection bootstrap and the payload
//! mapping for embedded rows.

mod config;
mod store;

#[cfg(test)]
mod tests;

pub use config::QdrantConfig;
pub use store::QdrantStore;

// Re-export core types for convenience
pub use tabrag_core::{Error, Result, SearchHit, VectorRecord, VectorStore};
