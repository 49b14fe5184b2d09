//! Event bus abstraction and the messages carried over it

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::{Error, Result};

/// Channel carrying notifications about newly uploaded files
pub const UPLOADS_CHANNEL: &str = "file_uploaded";

/// Channel announcing files whose ingestion completed
pub const DATASET_READY_CHANNEL: &str = "dataset_ready";

/// Notification that a file landed in storage and awaits ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadEvent {
    pub filename: String,
    /// Filesystem path the ingestion worker reads the file from
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

impl UploadEvent {
    pub fn new(filename: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_message(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Bus(e.to_string()))
    }

    pub fn from_message(message: &str) -> Result<Self> {
        serde_json::from_str(message)
            .map_err(|e| Error::Bus(format!("malformed upload event: {}", e)))
    }
}

/// Announcement that every row of an uploaded file is searchable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetReadyEvent {
    pub filename: String,
    pub rows: usize,
    pub timestamp: DateTime<Utc>,
}

impl DatasetReadyEvent {
    pub fn new(filename: impl Into<String>, rows: usize) -> Self {
        Self {
            filename: filename.into(),
            rows,
            timestamp: Utc::now(),
        }
    }

    pub fn to_message(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Bus(e.to_string()))
    }

    pub fn from_message(message: &str) -> Result<Self> {
        serde_json::from_str(message)
            .map_err(|e| Error::Bus(format!("malformed dataset-ready event: {}", e)))
    }
}

/// Ordered message stream handed out by [`EventBus::subscribe`].
///
/// Bus implementations keep the sender half and push messages into it from
/// their delivery path, so broker-backed buses and the in-process one hand
/// subscribers the same type.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<String>,
}

impl Subscription {
    /// Create a subscription together with the sender a bus feeds it from.
    pub fn channel() -> (mpsc::UnboundedSender<String>, Subscription) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Subscription { receiver })
    }

    /// Next message in publish order. `None` once the bus dropped this
    /// subscriber, e.g. at shutdown.
    pub async fn recv(&mut self) -> Option<String> {
        self.receiver.recv().await
    }
}

/// Publish/subscribe channel decoupling upload from ingestion.
///
/// Delivery is at-most-once: a message published while a channel has no
/// active subscriber is dropped. Per channel, each subscriber observes
/// messages in publish order.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Hand `message` to every active subscriber of `channel`.
    async fn publish(&self, channel: &str, message: &str) -> Result<()>;

    /// Open a message stream over `channel`.
    async fn subscribe(&self, channel: &str) -> Result<Subscription>;
}
