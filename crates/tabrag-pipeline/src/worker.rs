//! Upload worker: consumes upload events and drives ingestion

use std::path::Path;
use std::sync::Arc;

use tabrag_core::{
    Embedder, EventBus, Result, Subscription, UploadEvent, VectorStore, UPLOADS_CHANNEL,
};

use crate::ingest::IngestPipeline;

/// Consumes the uploads channel one message at a time and ingests each
/// announced file.
///
/// A failure handling one message is logged and swallowed; later messages
/// are still processed.
pub struct UploadWorker<E: Embedder, V: VectorStore, B: EventBus> {
    pipeline: Arc<IngestPipeline<E, V, B>>,
    bus: Arc<B>,
}

impl<E: Embedder + 'static, V: VectorStore, B: EventBus> UploadWorker<E, V, B> {
    pub fn new(pipeline: Arc<IngestPipeline<E, V, B>>, bus: Arc<B>) -> Self {
        Self { pipeline, bus }
    }

    /// Open the uploads subscription this worker will drain.
    pub async fn subscribe(&self) -> Result<Subscription> {
        self.bus.subscribe(UPLOADS_CHANNEL).await
    }

    /// Process messages until the publishing side closes the channel.
    pub async fn run(&self, mut subscription: Subscription) {
        while let Some(message) = subscription.recv().await {
            self.handle_message(&message).await;
        }
        tracing::info!("uploads channel closed, worker stopping");
    }

    async fn handle_message(&self, message: &str) {
        let event = match UploadEvent::from_message(message) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed upload event");
                return;
            }
        };

        tracing::info!(filename = %event.filename, "received upload notification");

        if let Err(err) = self.pipeline.ingest(Path::new(&event.path)).await {
            tracing::error!(filename = %event.filename, error = %err, "upload ingestion failed");
        }
    }
}
