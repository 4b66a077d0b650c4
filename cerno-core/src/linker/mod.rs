//! Discovers and classifies pairwise relationships between live principles.

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::constants::{LINKER_CANDIDATE_CAP, LINKER_CANDIDATE_MIN_SIMILARITY, LINK_CONTRADICTS_LOW, LINK_RELATED_LOW};
use crate::error::Result;
use crate::negation::is_negation_match;
use crate::store::{PrincipleStore, VectorIndex};
use crate::types::{LinkType, Principle, PrincipleLink};

/// Summary of one linking pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkerStats {
    /// Principles scanned for candidates.
    pub scanned: usize,
    /// Links inserted (idempotent; may include re-inserts of existing pairs).
    pub links_written: usize,
}

/// Drives pairwise relationship discovery and classification (§4.9).
pub struct Linker {
    principle_store: Arc<dyn PrincipleStore>,
    vector_index: Arc<dyn VectorIndex>,
    config: PipelineConfig,
}

impl Linker {
    /// Build a linker over the given principle store and vector index.
    #[must_use]
    pub fn new(principle_store: Arc<dyn PrincipleStore>, vector_index: Arc<dyn VectorIndex>, config: PipelineConfig) -> Self {
        Self {
            principle_store,
            vector_index,
            config,
        }
    }

    /// Discover and persist links for every live, embedded principle.
    pub async fn run(&self) -> Result<LinkerStats> {
        let principles = self
            .principle_store
            .list_live_with_embeddings(crate::constants::LIFECYCLE_SCAN_CAP)
            .await?;

        let mut stats = LinkerStats::default();

        for principle in &principles {
            stats.scanned += 1;
            let Some(embedding) = &principle.embedding else {
                continue;
            };
            let candidates = self
                .vector_index
                .nearest_principles(embedding, LINKER_CANDIDATE_CAP, Some(principle.id))
                .await?;

            for (candidate_id, similarity) in candidates {
                if similarity < LINKER_CANDIDATE_MIN_SIMILARITY {
                    continue;
                }
                let Some(candidate) = self.principle_store.get(candidate_id).await? else {
                    continue;
                };
                if !candidate.is_live() {
                    continue;
                }

                let link_type = classify_pair(principle, &candidate, similarity);
                let link = PrincipleLink::new(principle.id, candidate.id, link_type, similarity.clamp(0.0, 1.0));
                self.principle_store.insert_link(link).await?;
                stats.links_written += 1;
            }
        }

        Ok(stats)
    }
}

/// Classify the relationship between `source` and `candidate` at the given
/// cosine similarity. `source` is the conceptual "from" side for directional
/// types; storage normalizes ID order independently.
#[must_use]
fn classify_pair(source: &Principle, candidate: &Principle, similarity: f32) -> LinkType {
    if similarity >= crate::constants::LINK_REINFORCES_THRESHOLD {
        return LinkType::Reinforces;
    }

    if similarity >= LINK_RELATED_LOW && domains_overlap(source, candidate) {
        return LinkType::Related;
    }

    if similarity >= LINK_CONTRADICTS_LOW
        && similarity < LINK_RELATED_LOW
        && is_negation_match(&source.content.to_lowercase(), &candidate.content.to_lowercase())
    {
        return LinkType::Contradicts;
    }

    if tags_overlap(source, candidate) && !domains_overlap(source, candidate) {
        return if source.domains.len() > candidate.domains.len() {
            LinkType::Generalizes
        } else {
            LinkType::Specializes
        };
    }

    LinkType::Related
}

fn domains_overlap(a: &Principle, b: &Principle) -> bool {
    a.domains.intersection(&b.domains).next().is_some()
}

fn tags_overlap(a: &Principle, b: &Principle) -> bool {
    a.tags.intersection(&b.tags).next().is_some()
}
