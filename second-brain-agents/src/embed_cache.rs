//! Pre-agent single-embedding cache: guarantees at most one embedding call
//! per top-level recall/agent invocation by keying on `(query, modality)`.

use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    query: String,
    modality: String,
}

#[derive(Default)]
pub struct EmbedCache {
    entries: Mutex<HashMap<CacheKey, Vec<f32>>>,
}

impl EmbedCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, query: &str, modality: &str) -> Option<Vec<f32>> {
        let key = CacheKey {
            query: query.to_string(),
            modality: modality.to_string(),
        };
        self.entries.lock().get(&key).cloned()
    }

    pub fn put(&self, query: &str, modality: &str, embedding: Vec<f32>) {
        let key = CacheKey {
            query: query.to_string(),
            modality: modality.to_string(),
        };
        self.entries.lock().insert(key, embedding);
    }

    /// Get the cached embedding for `(query, modality)`, or compute it with
    /// `compute` and cache the result. `compute` runs at most once per key.
    pub async fn get_or_embed<F, Fut>(&self, query: &str, modality: &str, compute: F) -> second_brain_core::Result<Vec<f32>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = second_brain_core::Result<Vec<f32>>>,
    {
        if let Some(cached) = self.get(query, modality) {
            return Ok(cached);
        }
        let embedding = compute().await?;
        self.put(query, modality, embedding.clone());
        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn get_or_embed_computes_only_once_per_key() {
        let cache = EmbedCache::new();
        let calls = AtomicU32::new(0);
        for _ in 0..3 {
            cache
                .get_or_embed("same query", "text", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(vec![1.0, 2.0]) }
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_modalities_are_cached_separately() {
        let cache = EmbedCache::new();
        cache.put("q", "text", vec![1.0]);
        assert!(cache.get("q", "image").is_none());
        assert_eq!(cache.get("q", "text"), Some(vec![1.0]));
    }
}
