//! The long-term persisted knowledge unit promoted from one or more insights.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::insight::InsightCategory;

/// Five-way content classification for principles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipleCategory {
    /// Mapped from `InsightCategory::Technique` or `::Fact`.
    Learning,
    /// Mapped from `InsightCategory::Principle` or `::Pattern`.
    Principle,
    /// Reserved for administrative promotion; not produced by the automatic
    /// mapping table.
    Moral,
    /// Mapped from `InsightCategory::Convention` or `::Preference`.
    Heuristic,
    /// Mapped from `InsightCategory::Warning`.
    AntiPattern,
}

impl PrincipleCategory {
    /// The Promoter's fixed category mapping table.
    #[must_use]
    pub fn from_insight_category(category: InsightCategory) -> Self {
        match category {
            InsightCategory::Convention => Self::Heuristic,
            InsightCategory::Principle => Self::Principle,
            InsightCategory::Technique => Self::Learning,
            InsightCategory::Warning => Self::AntiPattern,
            InsightCategory::Preference => Self::Heuristic,
            InsightCategory::Fact => Self::Learning,
            InsightCategory::Pattern => Self::Principle,
        }
    }
}

/// Lifecycle status of a persisted principle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipleStatus {
    /// Eligible for linking, lifecycle updates, and retrieval.
    Active,
    /// Stale and low-rank; still retrievable until pruned.
    Decaying,
    /// Retained for audit, never retrieved.
    Pruned,
}

impl Default for PrincipleStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A persisted long-term knowledge unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principle {
    /// Store-assigned identity.
    pub id: Uuid,
    /// Primary content.
    pub content: String,
    /// Optional longer-form elaboration.
    pub elaboration: Option<String>,
    /// `SHA-256(content)`, unique across all principles.
    pub content_hash: String,
    /// Fixed-dimension embedding, inherited from the promoted insight.
    pub embedding: Option<Vec<f32>>,
    /// Content classification.
    pub category: PrincipleCategory,
    /// Free-form tags, inherited from the promoted insight.
    pub tags: HashSet<String>,
    /// Zero or more applicable domains.
    pub domains: HashSet<String>,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Non-negative observation frequency, inherited from the insight's
    /// `observation_count` at promotion time.
    pub frequency: i64,
    /// Recency score in `[0, 1]`, recomputed each lifecycle run.
    pub recency_score: f32,
    /// Source-quality score in `[0, 1]`.
    pub source_quality: f32,
    /// Composite rank in `[0, 1]`, recomputed each lifecycle run.
    pub rank: f32,
    /// Lifecycle status.
    pub status: PrincipleStatus,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Timestamp of the most recent field mutation, used for decay/prune age.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Principle {
    /// True if this principle is eligible for linking, hybrid retrieval, and
    /// lifecycle recomputation.
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self.status, PrincipleStatus::Active | PrincipleStatus::Decaying)
    }
}
