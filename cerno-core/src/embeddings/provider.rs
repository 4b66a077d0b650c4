//! The pluggable embedding provider boundary.

use async_trait::async_trait;

use crate::error::Result;

/// Converts text into fixed-dimension float vectors. Implementations are
/// external collaborators (an HTTP client to a hosted model, a local ONNX
/// runtime, or a test double); the pipeline only depends on this trait.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts in one round trip. The default implementation
    /// embeds sequentially; providers with native batch APIs should
    /// override this.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// The fixed dimension this provider produces, constant for the life of
    /// the process.
    fn dimension(&self) -> usize;
}

/// An in-memory provider for tests and local development: deterministic,
/// hash-derived vectors so repeated calls with the same text are stable and
/// cosine similarity exercises the full numeric range.
pub struct MockEmbeddingProvider {
    dimension: usize,
}

impl MockEmbeddingProvider {
    /// Build a provider producing vectors of `dimension` floats.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        use sha2::{Digest, Sha256};
        let mut out = Vec::with_capacity(self.dimension);
        let mut seed = Sha256::digest(text.as_bytes()).to_vec();
        while out.len() < self.dimension {
            seed = sha2::Sha256::digest(&seed).to_vec();
            for chunk in seed.chunks(4) {
                if out.len() >= self.dimension {
                    break;
                }
                let mut buf = [0u8; 4];
                buf[..chunk.len()].copy_from_slice(chunk);
                let v = u32::from_le_bytes(buf);
                // Map into [-1, 1].
                out.push((v as f32 / u32::MAX as f32) * 2.0 - 1.0);
            }
        }
        out
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// A provider that always fails, for exercising the pipeline's
/// embedding-failure degradation paths.
pub struct FailingEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(crate::error::Error::Provider("embedding provider unavailable".into()))
    }

    fn dimension(&self) -> usize {
        384
    }
}
