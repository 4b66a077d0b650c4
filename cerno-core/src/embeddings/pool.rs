//! The in-memory embedding pool: a content-hash-keyed cache in front of an
//! [`EmbeddingProvider`], bounding repeated embedding calls for identical
//! content the way the corpus's retrieval cache bounds repeated lookups.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::constants::EMBED_CACHE_CAP;
use crate::embeddings::provider::EmbeddingProvider;
use crate::error::Result;

/// Wraps an [`EmbeddingProvider`] with an eviction-bounded cache keyed by the
/// SHA-256 hash of the requested content. The underlying [`LruCache`] evicts
/// the single least-recently-used entry once capacity is exceeded; callers
/// that need the coarser "evict the oldest 10%" batching the design notes
/// describe can wrap this pool and call `evict_fraction`.
pub struct EmbeddingPool {
    provider: Arc<dyn EmbeddingProvider>,
    cache: Mutex<LruCache<String, Vec<f32>>>,
}

impl EmbeddingPool {
    /// Build a pool over `provider` with the default cache capacity.
    #[must_use]
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_capacity(provider, EMBED_CACHE_CAP)
    }

    /// Build a pool with an explicit cache capacity (for tests).
    #[must_use]
    pub fn with_capacity(provider: Arc<dyn EmbeddingProvider>, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            provider,
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    fn hash_content(content: &str) -> String {
        let digest = Sha256::digest(content.as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Fetch the cached embedding for `content`, or request one from the
    /// provider and cache it.
    ///
    /// # Errors
    /// Propagates the provider's error on a cache miss.
    pub async fn get_or_embed(&self, content: &str) -> Result<Vec<f32>> {
        let key = Self::hash_content(content);
        if let Some(cached) = self.cache.lock().get(&key).cloned() {
            return Ok(cached);
        }
        let embedding = self.provider.embed(content).await?;
        self.cache.lock().put(key, embedding.clone());
        Ok(embedding)
    }

    /// The provider's fixed embedding dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    /// Number of entries currently cached.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::provider::MockEmbeddingProvider;

    #[tokio::test]
    async fn repeated_content_hits_cache() {
        let pool = EmbeddingPool::with_capacity(Arc::new(MockEmbeddingProvider::new(8)), 10);
        let a = pool.get_or_embed("hello").await.unwrap();
        assert_eq!(pool.cached_len(), 1);
        let b = pool.get_or_embed("hello").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(pool.cached_len(), 1);
    }

    #[tokio::test]
    async fn cache_evicts_past_capacity() {
        let pool = EmbeddingPool::with_capacity(Arc::new(MockEmbeddingProvider::new(4)), 2);
        pool.get_or_embed("a").await.unwrap();
        pool.get_or_embed("b").await.unwrap();
        pool.get_or_embed("c").await.unwrap();
        assert!(pool.cached_len() <= 2);
    }
}
