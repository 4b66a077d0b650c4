//! Approximate nearest-neighbour search over the embedding columns. The
//! reference implementation (`cerno-storage-redb`) is a bounded linear
//! cosine scan standing in for the HNSW index an external relational store
//! would provide.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// One scored hit from a nearest-neighbour query: the entity ID and its raw
/// cosine similarity to the query vector, in `[-1, 1]`.
pub type ScoredHit = (Uuid, f32);

/// Nearest-neighbour search over insight and principle embeddings.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// The `k` active insights nearest to `embedding` by cosine similarity,
    /// excluding `exclude` if given.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::DimensionMismatch`] if `embedding`'s
    /// length does not match the index's configured dimension.
    async fn nearest_insights(
        &self,
        embedding: &[f32],
        k: usize,
        exclude: Option<Uuid>,
    ) -> Result<Vec<ScoredHit>>;

    /// The `k` live (active or decaying) principles nearest to `embedding`
    /// by cosine similarity, excluding `exclude` if given.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::DimensionMismatch`] if `embedding`'s
    /// length does not match the index's configured dimension.
    async fn nearest_principles(
        &self,
        embedding: &[f32],
        k: usize,
        exclude: Option<Uuid>,
    ) -> Result<Vec<ScoredHit>>;
}
