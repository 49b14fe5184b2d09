//! Bounded batch embedding

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use tabrag_core::{Embedder, Error, Result};

/// Embeds batches of texts through a shared client while capping the
/// number of in-flight requests.
///
/// Submission itself backpressures: a new request is not spawned until a
/// permit frees up. Results come back in input order; one failure fails
/// the whole batch with no partial results surfaced.
pub struct BoundedEmbedder<E: Embedder> {
    embedder: Arc<E>,
    fan_out: usize,
}

impl<E: Embedder + 'static> BoundedEmbedder<E> {
    pub fn new(embedder: Arc<E>, fan_out: usize) -> Self {
        Self {
            embedder,
            fan_out: fan_out.max(1),
        }
    }

    /// Embed every text with at most `fan_out` concurrent requests.
    pub async fn embed_all(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let semaphore = Arc::new(Semaphore::new(self.fan_out));
        let mut handles: Vec<JoinHandle<Result<Vec<f32>>>> = Vec::with_capacity(texts.len());

        for text in texts {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| Error::Embedding("embedding worker pool closed".to_string()))?;

            let embedder = self.embedder.clone();
            let text = text.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                embedder.embed(&text).await
            }));
        }

        let mut vectors = Vec::with_capacity(handles.len());
        for handle in handles {
            let vector = handle
                .await
                .map_err(|e| Error::Embedding(e.to_string()))??;
            vectors.push(vector);
        }

        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct SlowEmbedder {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        fail_on: Option<String>,
    }

    impl SlowEmbedder {
        fn new(fail_on: Option<&str>) -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                fail_on: fail_on.map(str::to_string),
            }
        }
    }

    #[async_trait]
    impl Embedder for SlowEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_on.as_deref() == Some(text) {
                return Err(Error::Embedding("model offline".to_string()));
            }

            Ok(vec![text.len() as f32])
        }
    }

    #[tokio::test]
    async fn results_come_back_in_input_order() {
        let embedder = Arc::new(SlowEmbedder::new(None));
        let pool = BoundedEmbedder::new(embedder, 3);

        let texts: Vec<String> = ["a", "bb", "ccc", "dddd", "eeeee"]
            .iter()
            .map(|t| t.to_string())
            .collect();

        let vectors = pool.embed_all(&texts).await.unwrap();
        let lengths: Vec<f32> = vectors.into_iter().map(|v| v[0]).collect();
        assert_eq!(lengths, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[tokio::test]
    async fn in_flight_requests_never_exceed_fan_out() {
        let embedder = Arc::new(SlowEmbedder::new(None));
        let pool = BoundedEmbedder::new(embedder.clone(), 2);

        let texts: Vec<String> = (0..8).map(|i| format!("row {}", i)).collect();
        pool.embed_all(&texts).await.unwrap();

        assert!(embedder.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn one_failure_fails_the_batch() {
        let embedder = Arc::new(SlowEmbedder::new(Some("bad row")));
        let pool = BoundedEmbedder::new(embedder, 4);

        let texts: Vec<String> = ["fine", "bad row", "also fine"]
            .iter()
            .map(|t| t.to_string())
            .collect();

        let err = pool.embed_all(&texts).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let embedder = Arc::new(SlowEmbedder::new(None));
        let pool = BoundedEmbedder::new(embedder, 2);

        let vectors = pool.embed_all(&[]).await.unwrap();
        assert!(vectors.is_empty());
    }
}
