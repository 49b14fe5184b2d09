//! In-process cache and event bus implementations
//!
//! Single-binary deployments use these; multi-process deployments can
//! substitute broker-backed implementations behind the same traits.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use tabrag_core::{Error, EventBus, ResponseCache, Result, Subscription};

/// In-memory key-value cache with lazy per-entry expiry
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::Cache("cache lock poisoned".to_string()))?;

        let live = match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Some(value.clone()),
            Some(_) => None,
            None => return Ok(None),
        };

        match live {
            Some(value) => Ok(Some(value)),
            None => {
                entries.remove(key);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::Cache("cache lock poisoned".to_string()))?;

        entries.insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }
}

/// In-process pub/sub bus over unbounded channels.
///
/// A message published on a channel with no live subscriber is dropped;
/// subscribers that went away are pruned on the next publish.
#[derive(Default)]
pub struct MemoryBus {
    channels: RwLock<HashMap<String, Vec<UnboundedSender<String>>>>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventBus for MemoryBus {
    async fn publish(&self, channel: &str, message: &str) -> Result<()> {
        let mut channels = self
            .channels
            .write()
            .map_err(|_| Error::Bus("bus lock poisoned".to_string()))?;

        if let Some(senders) = channels.get_mut(channel) {
            senders.retain(|sender| sender.send(message.to_string()).is_ok());
        }

        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<Subscription> {
        let (sender, subscription) = Subscription::channel();

        let mut channels = self
            .channels
            .write()
            .map_err(|_| Error::Bus("bus lock poisoned".to_string()))?;

        channels.entry(channel.to_string()).or_default().push(sender);
        Ok(subscription)
    }
}
