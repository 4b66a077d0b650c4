//! CRUD and similarity-adjacent queries for long-term units, plus the
//! provenance and link edges attached to them.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{Derivation, Principle, PrincipleLink};

/// Persistence surface for [`Principle`], [`Derivation`], and
/// [`PrincipleLink`] rows.
#[async_trait]
pub trait PrincipleStore: Send + Sync {
    /// Fetch one principle by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Principle>>;

    /// Exact-dedup lookup by content hash.
    async fn find_by_content_hash(&self, hash: &str) -> Result<Option<Principle>>;

    /// Insert a newly-promoted principle.
    async fn insert(&self, principle: Principle) -> Result<()>;

    /// Persist an in-place field update (rank, recency, status transition).
    async fn update(&self, principle: &Principle) -> Result<()>;

    /// Insert a derivation row. Idempotent on `(principle_id, insight_id)`.
    async fn insert_derivation(&self, derivation: Derivation) -> Result<()>;

    /// True if a derivation already links `insight_id` to any principle.
    async fn insight_has_derivation(&self, insight_id: Uuid) -> Result<bool>;

    /// Live (active or decaying) principles, capped at `limit`.
    async fn list_live(&self, limit: usize) -> Result<Vec<Principle>>;

    /// Live principles with a non-null embedding, capped at `limit`.
    async fn list_live_with_embeddings(&self, limit: usize) -> Result<Vec<Principle>>;

    /// Insert a link row. Idempotent on `(source_id, target_id, link_type)`.
    async fn insert_link(&self, link: PrincipleLink) -> Result<()>;

    /// Inbound+outbound link count for one principle, used by the rank
    /// formula's `link_norm` term.
    async fn link_count(&self, principle_id: Uuid) -> Result<usize>;
}
