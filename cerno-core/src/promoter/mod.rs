//! Promotes insights into principles with exact/semantic dedup and
//! derivation provenance.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::lifecycle::rank::compute_rank;
use crate::store::{PrincipleStore, VectorIndex};
use crate::types::{Derivation, Insight, Principle, PrincipleCategory, PrincipleStatus};

/// Outcome of promoting one insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionOutcome {
    /// A content-hash match already existed; only the derivation was
    /// ensured.
    SkippedExact,
    /// A semantic match already existed; only the derivation was ensured.
    SkippedSemantic,
    /// A new principle was created.
    Created,
}

/// Drives the Insights → Principles promotion step.
pub struct Promoter {
    principle_store: Arc<dyn PrincipleStore>,
    vector_index: Arc<dyn VectorIndex>,
    config: PipelineConfig,
}

impl Promoter {
    /// Build a promoter over the given principle store and vector index.
    #[must_use]
    pub fn new(principle_store: Arc<dyn PrincipleStore>, vector_index: Arc<dyn VectorIndex>, config: PipelineConfig) -> Self {
        Self {
            principle_store,
            vector_index,
            config,
        }
    }

    /// Promote one candidate insight (§4.8).
    pub async fn promote(&self, insight: &Insight) -> Result<PromotionOutcome> {
        let content_hash = insight.content_hash.clone();

        // Step 2: exact dedup.
        if let Some(existing) = self.principle_store.find_by_content_hash(&content_hash).await? {
            self.ensure_derivation(existing.id, insight.id).await?;
            return Ok(PromotionOutcome::SkippedExact);
        }

        // Step 3: semantic dedup against {active, decaying} principles.
        if let Some(embedding) = &insight.embedding {
            let neighbours = self.vector_index.nearest_principles(embedding, 1, None).await?;
            if let Some((nearest_id, similarity)) = neighbours.first().copied() {
                if similarity >= self.config.promotion_semantic_threshold {
                    self.ensure_derivation(nearest_id, insight.id).await?;
                    return Ok(PromotionOutcome::SkippedSemantic);
                }
            }
        }

        // Step 4: create.
        let now = Utc::now();
        let category = PrincipleCategory::from_insight_category(insight.category);
        let domains: HashSet<String> = insight.domain.iter().cloned().collect();
        let mut principle = Principle {
            id: uuid::Uuid::new_v4(),
            content: insight.content.clone(),
            elaboration: None,
            content_hash,
            embedding: insight.embedding.clone(),
            category,
            tags: insight.tags.clone(),
            domains,
            confidence: insight.confidence,
            frequency: insight.observation_count,
            recency_score: 1.0,
            source_quality: 0.5,
            rank: 0.0,
            status: PrincipleStatus::Active,
            created_at: now,
            updated_at: now,
        };
        principle.rank = compute_rank(&principle, 0, &self.config);

        let principle_id = principle.id;
        self.principle_store.insert(principle).await?;
        self.principle_store
            .insert_derivation(Derivation::promoted(principle_id, insight.id))
            .await?;

        Ok(PromotionOutcome::Created)
    }

    /// Insert the `(principle, insight)` derivation if absent. Relies on the
    /// store's idempotent unique-key insert rather than checking first.
    async fn ensure_derivation(&self, principle_id: uuid::Uuid, insight_id: uuid::Uuid) -> Result<()> {
        self.principle_store
            .insert_derivation(Derivation::promoted(principle_id, insight_id))
            .await
    }
}
