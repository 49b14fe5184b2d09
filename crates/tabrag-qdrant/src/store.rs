//! Qdrant vector store implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointId, PointStruct, ScoredPoint,
    SearchPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};

use tabrag_core::{Error, RecordPayload, Result, SearchHit, VectorRecord, VectorStore};

use crate::config::QdrantConfig;

/// Qdrant-backed vector store
pub struct QdrantStore {
    client: Qdrant,
    config: QdrantConfig,
}

impl QdrantStore {
    /// Create a new store from configuration
    pub fn new(config: QdrantConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.url)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new store from environment variables
    pub fn from_env() -> Result<Self> {
        let config = QdrantConfig::from_env()?;
        Self::new(config)
    }

    /// Name of the collection this store reads and writes
    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    /// Number of points currently stored in the collection
    pub async fn point_count(&self) -> Result<u64> {
        let info = self
            .client
            .collection_info(self.config.collection.clone())
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0))
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn ensure_collection(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(self.config.collection.clone())
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        if exists {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(self.config.collection.clone()).vectors_config(
                    VectorParamsBuilder::new(self.config.dimension, Distance::Cosine),
                ),
            )
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        tracing::info!(
            collection = %self.config.collection,
            dimension = self.config.dimension,
            "created Qdrant collection"
        );

        Ok(())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = records.into_iter().map(point_from_record).collect();

        self.client
            .upsert_points(
                UpsertPointsBuilder::new(self.config.collection.clone(), points).wait(true),
            )
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(())
    }

    async fn search(
        &self,
        vector: Vec<f32>,
        source_file: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchHit>> {
        let mut request =
            SearchPointsBuilder::new(self.config.collection.clone(), vector, limit as u64)
                .with_payload(true);

        if let Some(file) = source_file {
            request = request.filter(Filter::must([Condition::matches(
                "source_file",
                file.to_string(),
            )]));
        }

        let response = self
            .client
            .search_points(request)
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        let mut hits = Vec::new();
        for point in response.result {
            match hit_from_point(point) {
                Some(hit) => hits.push(hit),
                // Foreign records in the collection are not ours to rank
                None => tracing::warn!("skipping search hit with malformed payload"),
            }
        }

        Ok(hits)
    }
}

/// Convert one record into a Qdrant point, flattening the payload fields.
pub(crate) fn point_from_record(record: VectorRecord) -> PointStruct {
    let mut payload = Payload::new();
    payload.insert("source_file", record.payload.source_file);
    payload.insert("row_index", record.payload.row_index as i64);
    payload.insert("text", record.payload.text);
    payload.insert("timestamp", record.payload.timestamp.to_rfc3339());

    PointStruct::new(record.id, record.vector, payload)
}

/// Rebuild a search hit from a scored point. `None` when the point id or
/// any payload field is missing or the wrong type.
pub(crate) fn hit_from_point(point: ScoredPoint) -> Option<SearchHit> {
    let id = match point.id {
        Some(PointId {
            point_id_options: Some(PointIdOptions::Uuid(uuid)),
        }) => uuid,
        Some(PointId {
            point_id_options: Some(PointIdOptions::Num(num)),
        }) => num.to_string(),
        _ => return None,
    };

    let source_file = string_field(&point.payload, "source_file")?;
    let row_index = usize::try_from(integer_field(&point.payload, "row_index")?).ok()?;
    let text = string_field(&point.payload, "text")?;
    let timestamp = string_field(&point.payload, "timestamp")
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))?;

    Some(SearchHit {
        id,
        score: point.score,
        payload: RecordPayload {
            source_file,
            row_index,
            text,
            timestamp,
        },
    })
}

fn string_field(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
    match payload.get(key) {
        Some(Value {
            kind: Some(Kind::StringValue(value)),
        }) => Some(value.clone()),
        _ => None,
    }
}

fn integer_field(payload: &HashMap<String, Value>, key: &str) -> Option<i64> {
    match payload.get(key) {
        Some(Value {
            kind: Some(Kind::IntegerValue(value)),
        }) => Some(*value),
        _ => None,
    }
}
