//! Response cache abstraction

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

/// Key-value store with per-write expiry, used to memoize query answers.
///
/// Implementations report their own failures; the query pipeline treats a
/// failed `get` as a miss and a failed `set` as a warning, never as a
/// query failure.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Look up a cached value. `None` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}
