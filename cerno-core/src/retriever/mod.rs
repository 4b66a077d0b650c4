//! Hybrid retrieval of principles relevant to a target file, with a
//! rank-only fallback when embedding the file content fails.

use std::sync::Arc;

use tracing::warn;

use crate::classifier::classify_text;
use crate::config::PipelineConfig;
use crate::constants::{
    FILE_DOMAIN_TOP_N, HYBRID_WEIGHT_DOMAIN, HYBRID_WEIGHT_RANK, HYBRID_WEIGHT_SIMILARITY, RANK_ONLY_WEIGHT_DOMAIN,
    RANK_ONLY_WEIGHT_RANK, RETRIEVAL_EMBED_TRUNCATE_CHARS, RETRIEVAL_NEIGHBOUR_CAP,
};
use crate::embeddings::pool::EmbeddingPool;
use crate::error::Result;
use crate::store::{PrincipleStore, VectorIndex};
use crate::types::Principle;

/// One principle scored against a target file.
#[derive(Debug, Clone)]
pub struct RetrievedPrinciple {
    /// The scored principle.
    pub principle: Principle,
    /// Combined hybrid (or rank-only) score used for ranking and the
    /// `min_hybrid_score` filter.
    pub score: f32,
    /// Raw cosine similarity to the file content, absent under the
    /// rank-only fallback.
    pub similarity: Option<f32>,
}

/// Result of one retrieval call.
#[derive(Debug, Clone, Default)]
pub struct RetrievalOutcome {
    /// Principles to surface, sorted by descending score, capped at
    /// `max_principles`.
    pub kept: Vec<RetrievedPrinciple>,
    /// Always empty from the Retriever itself; the Resolver splits this out
    /// of `kept` once it has per-section embeddings to classify against.
    pub conflicts: Vec<RetrievedPrinciple>,
    /// Domains detected in the file content, most frequent first.
    pub domains: Vec<String>,
    /// True if the embedding call failed and scoring fell back to
    /// rank-and-domain only.
    pub used_rank_only_fallback: bool,
}

/// Drives hybrid retrieval for one target file (§4.11).
pub struct Retriever {
    principle_store: Arc<dyn PrincipleStore>,
    vector_index: Arc<dyn VectorIndex>,
    embedding_pool: Arc<EmbeddingPool>,
    config: PipelineConfig,
}

impl Retriever {
    /// Build a retriever over the given principle store, vector index, and
    /// embedding pool.
    #[must_use]
    pub fn new(
        principle_store: Arc<dyn PrincipleStore>,
        vector_index: Arc<dyn VectorIndex>,
        embedding_pool: Arc<EmbeddingPool>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            principle_store,
            vector_index,
            embedding_pool,
            config,
        }
    }

    /// Retrieve principles relevant to `content`.
    pub async fn retrieve(&self, content: &str) -> Result<RetrievalOutcome> {
        let domains = detect_domains(content);
        let truncated = truncate_for_embedding(content);

        match self.embedding_pool.get_or_embed(&truncated).await {
            Ok(embedding) => self.hybrid_retrieve(&embedding, &domains).await,
            Err(err) => {
                warn!(error = %err, "embedding failed, falling back to rank-only retrieval");
                self.rank_only_retrieve(&domains).await
            }
        }
    }

    async fn hybrid_retrieve(&self, embedding: &[f32], domains: &[String]) -> Result<RetrievalOutcome> {
        let neighbours = self
            .vector_index
            .nearest_principles(embedding, RETRIEVAL_NEIGHBOUR_CAP, None)
            .await?;

        let mut kept = Vec::new();

        for (id, similarity) in neighbours {
            let Some(principle) = self.principle_store.get(id).await? else {
                continue;
            };
            if !principle.is_live() {
                continue;
            }

            if similarity >= self.config.already_represented_threshold {
                continue;
            }

            let domain_score = domain_overlap_score(&principle, domains);
            let score = HYBRID_WEIGHT_SIMILARITY * similarity.max(0.0)
                + HYBRID_WEIGHT_RANK * principle.rank
                + HYBRID_WEIGHT_DOMAIN * domain_score;

            if score < self.config.min_hybrid_score {
                continue;
            }

            kept.push(RetrievedPrinciple {
                principle: principle.clone(),
                score,
                similarity: Some(similarity),
            });
        }

        kept.sort_by(|a, b| b.score.total_cmp(&a.score));
        kept.truncate(self.config.max_principles);

        Ok(RetrievalOutcome {
            kept,
            conflicts: Vec::new(),
            domains: domains.to_vec(),
            used_rank_only_fallback: false,
        })
    }

    async fn rank_only_retrieve(&self, domains: &[String]) -> Result<RetrievalOutcome> {
        let principles = self
            .principle_store
            .list_live(crate::constants::LIFECYCLE_SCAN_CAP)
            .await?;

        let mut kept: Vec<RetrievedPrinciple> = principles
            .into_iter()
            .map(|principle| {
                let domain_score = domain_overlap_score(&principle, domains);
                let score = RANK_ONLY_WEIGHT_RANK * principle.rank + RANK_ONLY_WEIGHT_DOMAIN * domain_score;
                RetrievedPrinciple {
                    principle,
                    score,
                    similarity: None,
                }
            })
            .filter(|entry| entry.score >= self.config.min_hybrid_score)
            .collect();

        kept.sort_by(|a, b| b.score.total_cmp(&a.score));
        kept.truncate(self.config.max_principles);

        Ok(RetrievalOutcome {
            kept,
            conflicts: Vec::new(),
            domains: domains.to_vec(),
            used_rank_only_fallback: true,
        })
    }
}

/// Classify each blank-line-delimited paragraph and keep the
/// [`FILE_DOMAIN_TOP_N`] most frequently hit domains.
#[must_use]
fn detect_domains(content: &str) -> Vec<String> {
    use std::collections::HashMap;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for paragraph in content.split("\n\n") {
        if paragraph.trim().is_empty() {
            continue;
        }
        if let Some(domain) = classify_text(paragraph, None).domain {
            *counts.entry(domain).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(FILE_DOMAIN_TOP_N).map(|(d, _)| d).collect()
}

/// Fraction of the file's detected domains also present on the principle;
/// `0.0` when the file has no detected domains.
#[must_use]
fn domain_overlap_score(principle: &Principle, file_domains: &[String]) -> f32 {
    if file_domains.is_empty() {
        return 0.0;
    }
    let hits = file_domains.iter().filter(|d| principle.domains.contains(*d)).count();
    hits as f32 / file_domains.len() as f32
}

/// Truncate to [`RETRIEVAL_EMBED_TRUNCATE_CHARS`] characters on a char
/// boundary.
#[must_use]
fn truncate_for_embedding(content: &str) -> String {
    if content.chars().count() <= RETRIEVAL_EMBED_TRUNCATE_CHARS {
        return content.to_string();
    }
    content.chars().take(RETRIEVAL_EMBED_TRUNCATE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_domains_picks_most_frequent() {
        let content = "Always format cargo crates with clippy.\n\nAlways format cargo crates with clippy.\n\nUse SQL transactions for database writes.";
        let domains = detect_domains(content);
        assert_eq!(domains.first(), Some(&"rust".to_string()));
    }

    #[test]
    fn domain_overlap_score_is_fraction_of_file_domains_matched() {
        let now = chrono::Utc::now();
        let mut principle = sample_principle(now);
        principle.domains.insert("rust".to_string());
        let score = domain_overlap_score(&principle, &["rust".to_string(), "sql".to_string()]);
        assert!((score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn truncate_respects_char_boundary_and_cap() {
        let content = "a".repeat(RETRIEVAL_EMBED_TRUNCATE_CHARS + 100);
        let truncated = truncate_for_embedding(&content);
        assert_eq!(truncated.chars().count(), RETRIEVAL_EMBED_TRUNCATE_CHARS);
    }

    fn sample_principle(now: chrono::DateTime<chrono::Utc>) -> Principle {
        Principle {
            id: uuid::Uuid::new_v4(),
            content: "content".into(),
            elaboration: None,
            content_hash: "hash".into(),
            embedding: None,
            category: crate::types::PrincipleCategory::Learning,
            tags: Default::default(),
            domains: Default::default(),
            confidence: 0.8,
            frequency: 1,
            recency_score: 1.0,
            source_quality: 0.5,
            rank: 0.5,
            status: crate::types::PrincipleStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}
