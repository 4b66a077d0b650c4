//! [`VectorIndex`] implementation: a bounded linear cosine scan over the
//! insight and principle tables rather than a dedicated ANN index.

use async_trait::async_trait;
use uuid::Uuid;

use cerno_core::embeddings::similarity::cosine_similarity;
use cerno_core::error::Result;
use cerno_core::store::{ScoredHit, VectorIndex};
use cerno_core::types::InsightStatus;

use crate::RedbStore;

#[async_trait]
impl VectorIndex for RedbStore {
    async fn nearest_insights(&self, embedding: &[f32], k: usize, exclude: Option<Uuid>) -> Result<Vec<ScoredHit>> {
        let mut hits = Vec::new();
        for insight in self.list_all_insights().await? {
            if insight.status != InsightStatus::Active || Some(insight.id) == exclude {
                continue;
            }
            let Some(candidate_embedding) = &insight.embedding else {
                continue;
            };
            let similarity = cosine_similarity(embedding, candidate_embedding)?;
            hits.push((insight.id, similarity));
        }
        hits.sort_unstable_by(|a, b| b.1.total_cmp(&a.1));
        hits.truncate(k);
        Ok(hits)
    }

    async fn nearest_principles(&self, embedding: &[f32], k: usize, exclude: Option<Uuid>) -> Result<Vec<ScoredHit>> {
        let mut hits = Vec::new();
        for principle in self.list_all_principles().await? {
            if !principle.is_live() || Some(principle.id) == exclude {
                continue;
            }
            let Some(candidate_embedding) = &principle.embedding else {
                continue;
            };
            let similarity = cosine_similarity(embedding, candidate_embedding)?;
            hits.push((principle.id, similarity));
        }
        hits.sort_unstable_by(|a, b| b.1.total_cmp(&a.1));
        hits.truncate(k);
        Ok(hits)
    }
}
