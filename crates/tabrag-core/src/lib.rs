//! Core traits and types for the tabrag workspace
//!
//! Everything the pipelines depend on lives here: the error taxonomy, the
//! data model for embedded rows, and the traits the external collaborators
//! (embedding model, vector store, cache, generator, event bus) implement.
//! Service crates depend on this crate, never on each other.

pub mod bus;
pub mod cache;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod store;
pub mod unit;

pub use bus::{
    DatasetReadyEvent, EventBus, Subscription, UploadEvent, DATASET_READY_CHANNEL, UPLOADS_CHANNEL,
};
pub use cache::ResponseCache;
pub use embedding::Embedder;
pub use error::{Error, Result};
pub use generation::Generator;
pub use store::VectorStore;
pub use unit::{IngestReport, RecordPayload, SearchHit, TextUnit, VectorRecord};
