//! Ingestion and query pipelines over tabular datasets
//!
//! Wires the embedding, vector store, cache and generation clients into the
//! two flows the application exposes: turning an uploaded CSV file into
//! searchable vector records, and answering a question against the rows of
//! one previously ingested file.

pub mod config;
pub mod embed;
pub mod ingest;
pub mod memory;
pub mod query;
pub mod rank;
pub mod tabular;
pub mod worker;


// Re-export main types for convenience
pub use config::PipelineConfig;
pub use embed::BoundedEmbedder;
pub use ingest::IngestPipeline;
pub use memory::{MemoryBus, MemoryCache};
pub use query::{cache_key, QueryPipeline};
pub use tabular::parse_file;
pub use worker::UploadWorker;

pub use tabrag_core::{Error, Result};
