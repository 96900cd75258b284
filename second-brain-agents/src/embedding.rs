//! Multimodal embedding and reranking adapters (§4.5). Each trait has a
//! primary provider plus an optional fallback; scores pass through to
//! `MemoryMatch` unchanged, never rescaled by this layer.

use async_trait::async_trait;
use second_brain_core::domain::MemoryMatch;
use second_brain_core::error::Result;
use sha2::{Digest, Sha256};

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    async fn embed_multimodal(&self, parts: &[String]) -> Result<Vec<f32>> {
        self.embed(&parts.join(" ")).await
    }
}

#[async_trait]
pub trait Reranker: Send + Sync {
    /// Rerank `matches` against `query`, optionally steered by a free-text
    /// `instruction`. Both `None` and `Some("")` mean "no special
    /// instruction" and are passed through to the provider verbatim (§9).
    async fn rerank(&self, query: &str, instruction: Option<&str>, matches: Vec<MemoryMatch>) -> Result<Vec<MemoryMatch>>;
}

/// Deterministic, offline embedder: hashes the text into a fixed-size
/// pseudo-embedding. Used for tests and as the last-resort fallback when no
/// real embedding provider is configured.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(32)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let normalized = second_brain_core::util::normalize_for_identity(text);
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        let digest = hasher.finalize();
        let mut out = Vec::with_capacity(self.dimension);
        for i in 0..self.dimension {
            let byte = digest[i % digest.len()];
            out.push((byte as f32 / 255.0) * 2.0 - 1.0);
        }
        Ok(out)
    }
}

/// Tries a primary embedder, falling back to a secondary on failure.
pub struct FallbackEmbedder {
    primary: Box<dyn Embedder>,
    fallback: Option<Box<dyn Embedder>>,
}

impl FallbackEmbedder {
    #[must_use]
    pub fn new(primary: Box<dyn Embedder>, fallback: Option<Box<dyn Embedder>>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl Embedder for FallbackEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self.primary.embed(text).await {
            Ok(v) => Ok(v),
            Err(e) => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(event = "embedding.primary_failed", error = %second_brain_core::error::sanitize(&e));
                    fallback.embed(text).await
                }
                None => Err(e),
            },
        }
    }
}

/// Wraps another embedder and counts calls to `embed`, for tests that must
/// assert an exact invocation count (§8 scenario 1, testable invariant 3).
#[cfg(test)]
pub struct CountingEmbedder<E> {
    inner: E,
    pub calls: std::sync::atomic::AtomicU32,
}

#[cfg(test)]
impl<E> CountingEmbedder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            calls: std::sync::atomic::AtomicU32::new(0),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl<E: Embedder> Embedder for CountingEmbedder<E> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.inner.embed(text).await
    }
}

/// A no-op reranker: returns matches in their incoming order. Used when
/// reranking is disabled or as the fallback after a reranker failure.
pub struct PassthroughReranker;

#[async_trait]
impl Reranker for PassthroughReranker {
    async fn rerank(&self, _query: &str, _instruction: Option<&str>, matches: Vec<MemoryMatch>) -> Result<Vec<MemoryMatch>> {
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_embedder_is_deterministic() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("hello world").await.unwrap();
        let b = embedder.embed("hello world").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn hash_embedder_differs_for_different_text() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("hello").await.unwrap();
        let b = embedder.embed("goodbye").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn fallback_embedder_uses_fallback_when_primary_unset() {
        struct AlwaysFails;
        #[async_trait]
        impl Embedder for AlwaysFails {
            async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
                Err(second_brain_core::Error::Unavailable("down".to_string()))
            }
        }
        let embedder = FallbackEmbedder::new(Box::new(AlwaysFails), Some(Box::new(HashEmbedder::default())));
        let result = embedder.embed("hi").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn passthrough_reranker_preserves_order() {
        use second_brain_core::domain::MatchSource;
        let matches = vec![
            MemoryMatch::new(MatchSource::Mem0, "1", "a", 0.9),
            MemoryMatch::new(MatchSource::Mem0, "2", "b", 0.1),
        ];
        let reranked = PassthroughReranker.rerank("q", None, matches.clone()).await.unwrap();
        assert_eq!(reranked[0].id, matches[0].id);
    }
}
