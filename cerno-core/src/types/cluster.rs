//! A connected component of the insight-similarity graph, fully rebuilt each
//! reconciliation run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One connected component of active, embedded insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Store-assigned identity.
    pub id: Uuid,
    /// Generated name, `cluster-N`.
    pub name: String,
    /// Element-wise mean of member embeddings.
    pub centroid: Vec<f32>,
    /// Mean pairwise cosine similarity across members; `1.0` for a singleton.
    pub coherence_score: f32,
    /// Number of member insights.
    pub insight_count: i64,
}

impl Cluster {
    /// Build a cluster from a component's member embeddings, computing
    /// centroid and coherence per the reconciler's rules.
    #[must_use]
    pub fn from_members(name: String, member_embeddings: &[Vec<f32>]) -> Self {
        let centroid = crate::embeddings::similarity::centroid(member_embeddings);
        let coherence_score = crate::embeddings::similarity::mean_pairwise_cosine(member_embeddings);
        Self {
            id: Uuid::new_v4(),
            name,
            centroid,
            coherence_score,
            insight_count: member_embeddings.len() as i64,
        }
    }
}
