//! Ingestion pipeline: one file from parse to announcement

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use tabrag_core::{
    DatasetReadyEvent, Embedder, Error, EventBus, IngestReport, Result, VectorRecord, VectorStore,
    DATASET_READY_CHANNEL,
};

use crate::embed::BoundedEmbedder;
use crate::tabular;

/// Drives one uploaded file through parse, embed, store and announce.
///
/// Failures at any stage are logged with context and returned; nothing is
/// published for a failed run and nothing is retried.
pub struct IngestPipeline<E: Embedder, V: VectorStore, B: EventBus> {
    embedder: BoundedEmbedder<E>,
    store: Arc<V>,
    bus: Arc<B>,
    dimension: usize,
}

impl<E: Embedder + 'static, V: VectorStore, B: EventBus> IngestPipeline<E, V, B> {
    pub fn new(
        embedder: Arc<E>,
        store: Arc<V>,
        bus: Arc<B>,
        fan_out: usize,
        dimension: usize,
    ) -> Self {
        Self {
            embedder: BoundedEmbedder::new(embedder, fan_out),
            store,
            bus,
            dimension,
        }
    }

    /// Ingest one file and announce it on the dataset-ready channel.
    pub async fn ingest(&self, path: &Path) -> Result<IngestReport> {
        match self.run(path).await {
            Ok(report) => {
                tracing::info!(
                    filename = %report.filename,
                    rows = report.rows,
                    "file ingested"
                );
                Ok(report)
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "ingestion failed");
                Err(err)
            }
        }
    }

    async fn run(&self, path: &Path) -> Result<IngestReport> {
        let filename = tabular::source_name(path);

        let units = tabular::parse_file(path)?;
        tracing::debug!(filename = %filename, rows = units.len(), stage = "parsed", "tabular file parsed");

        let texts: Vec<String> = units.iter().map(|unit| unit.text.clone()).collect();
        let vectors = self.embedder.embed_all(&texts).await?;

        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(Error::Embedding(format!(
                    "expected vectors of dimension {}, model returned {}",
                    self.dimension,
                    vector.len()
                )));
            }
        }
        tracing::debug!(filename = %filename, stage = "embedded", "row texts embedded");

        let timestamp = Utc::now();
        let records: Vec<VectorRecord> = units
            .iter()
            .zip(vectors)
            .map(|(unit, vector)| VectorRecord::from_unit(unit, vector, timestamp))
            .collect();
        let rows = records.len();

        self.store.ensure_collection().await?;
        self.store.upsert(records).await?;
        tracing::debug!(filename = %filename, stage = "stored", "records upserted");

        let event = DatasetReadyEvent::new(filename.clone(), rows);
        self.bus
            .publish(DATASET_READY_CHANNEL, &event.to_message()?)
            .await?;

        Ok(IngestReport { filename, rows })
    }
}
