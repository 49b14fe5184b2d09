//! Data types flowing through the ingestion and query pipelines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of a tabular file, flattened to the text that gets embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextUnit {
    /// Name of the file this row came from
    pub source_file: String,
    /// Zero-based data-row position, header excluded
    pub row_index: usize,
    /// Concatenated cell text for this row
    pub text: String,
}

/// Metadata stored alongside each vector. Written once at ingestion and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    pub source_file: String,
    pub row_index: usize,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A vector plus its payload, as handed to the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Collision-resistant identifier, unique across ingestion runs
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: RecordPayload,
}

impl VectorRecord {
    /// Build a record for one embedded unit with a freshly generated id.
    pub fn from_unit(unit: &TextUnit, vector: Vec<f32>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vector,
            payload: RecordPayload {
                source_file: unit.source_file.clone(),
                row_index: unit.row_index,
                text: unit.text.clone(),
                timestamp,
            },
        }
    }
}

/// One similarity-search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    /// Cosine similarity reported by the store, higher is closer
    pub score: f32,
    pub payload: RecordPayload,
}

/// Summary of a completed ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub filename: String,
    pub rows: usize,
}
