//! The short-term persisted knowledge unit produced by the Accumulator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Seven-way content classification applied to every insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    /// A stated convention ("always", "naming", "prefer").
    Convention,
    /// A general principle.
    Principle,
    /// A concrete technique.
    Technique,
    /// A warning ("never", "don't", "avoid", "forbidden").
    Warning,
    /// A stated preference.
    Preference,
    /// A plain fact; the default category.
    Fact,
    /// An observed pattern.
    Pattern,
}

impl Default for InsightCategory {
    fn default() -> Self {
        Self::Fact
    }
}

/// Lifecycle status of a persisted insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    /// Eligible for clustering, confidence adjustment, and promotion.
    Active,
    /// Has an unresolved contradiction.
    Contradicted,
    /// Absorbed by a winner during intra-cluster dedup.
    Superseded,
    /// Awaiting administrative review.
    PendingReview,
}

impl Default for InsightStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A persisted short-term knowledge unit: the deduplicated content of one or
/// more fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Store-assigned identity.
    pub id: Uuid,
    /// Deduplicated text content.
    pub content: String,
    /// `SHA-256(content)`, unique across all insights.
    pub content_hash: String,
    /// Fixed-dimension embedding, absent if the provider failed at creation
    /// time.
    pub embedding: Option<Vec<f32>>,
    /// Content classification.
    pub category: InsightCategory,
    /// Free-form tags, capped at [`crate::constants::MAX_TAGS`].
    pub tags: HashSet<String>,
    /// Detected domain, absent if no probe matched.
    pub domain: Option<String>,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Number of fragments that have contributed to this insight.
    pub observation_count: i64,
    /// Timestamp of the first contributing fragment.
    pub first_seen_at: DateTime<Utc>,
    /// Timestamp of the most recent contributing fragment.
    pub last_seen_at: DateTime<Utc>,
    /// Insertion timestamp, used for age computation in promotion gating.
    pub inserted_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: InsightStatus,
}

impl Insight {
    /// Construct a newly-created insight with the defaults from the
    /// Accumulator's create step (`confidence = 0.5`, `observation_count = 1`,
    /// `status = active`).
    #[must_use]
    pub fn new_created(
        content: String,
        content_hash: String,
        embedding: Option<Vec<f32>>,
        category: InsightCategory,
        tags: HashSet<String>,
        domain: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            content_hash,
            embedding,
            category,
            tags,
            domain,
            confidence: 0.5,
            observation_count: 1,
            first_seen_at: now,
            last_seen_at: now,
            inserted_at: now,
            status: InsightStatus::Active,
        }
    }

    /// True when a fresh fragment observation may update this insight
    /// in-place (exact or semantic dedup target).
    #[must_use]
    pub fn is_dedup_target(&self) -> bool {
        self.status == InsightStatus::Active
    }
}
