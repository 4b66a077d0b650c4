//! CRUD, similarity-adjacent queries, and range search for short-term units.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::types::{Cluster, Contradiction, Insight, InsightSource};

/// Filters for the Reconciler's promotion-candidate query (§4.4).
#[derive(Debug, Clone, Copy)]
pub struct PromotionQuery {
    /// Minimum confidence, inclusive.
    pub min_confidence: f32,
    /// Minimum observation count, inclusive.
    pub min_observations: i64,
    /// Minimum age, in days.
    pub min_age_days: i64,
    /// Maximum rows returned.
    pub limit: usize,
}

/// One rebuilt cluster and the active insight IDs that belong to it, as
/// produced by the Clusterer and persisted atomically.
pub struct ClusterBuild {
    /// The cluster row.
    pub cluster: Cluster,
    /// Member insight IDs.
    pub member_ids: Vec<Uuid>,
}

/// Persistence surface for [`Insight`], [`InsightSource`], [`Contradiction`],
/// and [`Cluster`] rows.
#[async_trait]
pub trait InsightStore: Send + Sync {
    /// Fetch one insight by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Insight>>;

    /// Exact-dedup lookup by content hash.
    async fn find_by_content_hash(&self, hash: &str) -> Result<Option<Insight>>;

    /// Insert a newly-created insight.
    async fn insert(&self, insight: Insight) -> Result<()>;

    /// Persist an in-place field update (confidence adjustment, status
    /// transition, supersession).
    async fn update(&self, insight: &Insight) -> Result<()>;

    /// Increment `observation_count` and advance `last_seen_at` to `max(cur,
    /// seen_at)` — the exact/semantic-dedup update path (accumulator steps A
    /// and C).
    async fn record_observation(&self, id: Uuid, seen_at: DateTime<Utc>) -> Result<()>;

    /// Insert a source row. Idempotent: a unique-key collision on
    /// `fragment_id` is swallowed and treated as success.
    async fn insert_source(&self, source: InsightSource) -> Result<()>;

    /// All source rows for one insight.
    async fn sources_for(&self, insight_id: Uuid) -> Result<Vec<InsightSource>>;

    /// Active insights with a non-null embedding, ordered by
    /// `observation_count` descending, capped at `limit`.
    async fn list_active_with_embeddings(&self, limit: usize) -> Result<Vec<Insight>>;

    /// All active insights, capped at `limit` — used by confidence
    /// adjustment.
    async fn list_active(&self, limit: usize) -> Result<Vec<Insight>>;

    /// Insert a contradiction row. Idempotent on the unordered-pair unique
    /// index.
    async fn insert_contradiction(&self, contradiction: Contradiction) -> Result<()>;

    /// True if any contradiction referencing `insight_id` is unresolved.
    async fn has_unresolved_contradiction(&self, insight_id: Uuid) -> Result<bool>;

    /// Promotion candidates matching [`PromotionQuery`], excluding insights
    /// with an unresolved contradiction or an existing derivation.
    async fn promotion_candidates(&self, query: PromotionQuery) -> Result<Vec<Insight>>;

    /// Atomically drop all clusters and their join rows, then insert the
    /// rebuilt set.
    async fn rebuild_clusters(&self, clusters: Vec<ClusterBuild>) -> Result<()>;

    /// All current clusters.
    async fn list_clusters(&self) -> Result<Vec<Cluster>>;

    /// Active members of one cluster.
    async fn cluster_members(&self, cluster_id: Uuid) -> Result<Vec<Insight>>;
}
