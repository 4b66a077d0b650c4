//! A stored, typed conflict between two insights.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a contradiction was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionType {
    /// Negation heuristic matched directly.
    Direct,
    /// Similarity window matched but negation heuristic did not (cross-cluster
    /// centroid scan only).
    Partial,
    /// Flagged for context-dependent review.
    Contextual,
}

/// Administrative resolution state of a contradiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Not yet reviewed; still penalizes confidence.
    Unresolved,
    /// Reviewed and resolved.
    Resolved,
    /// Reviewed and dismissed as a false positive.
    Dismissed,
}

impl Default for ResolutionStatus {
    fn default() -> Self {
        Self::Unresolved
    }
}

/// A pair of insights flagged as contradictory. Stored with `insight_a_id <
/// insight_b_id`; unique on the unordered pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contradiction {
    /// Store-assigned identity.
    pub id: Uuid,
    /// Smaller of the two insight IDs.
    pub insight_a_id: Uuid,
    /// Larger of the two insight IDs.
    pub insight_b_id: Uuid,
    /// Classification.
    pub contradiction_type: ContradictionType,
    /// Administrative state.
    pub resolution_status: ResolutionStatus,
    /// Component that detected this contradiction (`"accumulator"` or
    /// `"clusterer"`).
    pub detected_by: String,
    /// Cosine similarity observed at detection time, in `[0, 1]`.
    pub similarity_score: f32,
    /// Free-form description.
    pub description: String,
}

impl Contradiction {
    /// Normalize a pair of insight IDs into `(min, max)` order, as every
    /// Contradiction row requires.
    #[must_use]
    pub fn normalize_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
        if a < b { (a, b) } else { (b, a) }
    }

    /// Construct a new contradiction row with IDs already normalized.
    #[must_use]
    pub fn new(
        a: Uuid,
        b: Uuid,
        contradiction_type: ContradictionType,
        detected_by: &str,
        similarity_score: f32,
        description: String,
    ) -> Self {
        let (insight_a_id, insight_b_id) = Self::normalize_pair(a, b);
        Self {
            id: Uuid::new_v4(),
            insight_a_id,
            insight_b_id,
            contradiction_type,
            resolution_status: ResolutionStatus::Unresolved,
            detected_by: detected_by.to_string(),
            similarity_score,
            description,
        }
    }
}
