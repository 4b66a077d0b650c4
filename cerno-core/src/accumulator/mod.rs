//! Drives the upward flow for a single file path: fragments → insights,
//! with exact/semantic dedup and a contradiction probe on newly-created
//! insights.
//!
//! Per-path exclusivity is tracked in an explicit state map rather than one
//! owned `tokio::task` per path with its own mailbox — the store traits
//! already serialize the writes that matter, so the map gives the same
//! "strictly serial per path, cooldown after completion" guarantee with
//! less machinery. See `DESIGN.md` for the tradeoff.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::classifier::classify_fragment;
use crate::config::PipelineConfig;
use crate::constants::CONTRADICTION_PROBE_CAP;
use crate::embeddings::EmbeddingPool;
use crate::error::Result;
use crate::negation::is_negation_match;
use crate::parser::{compute_file_hash, ContextParser};
use crate::store::{InsightStore, MetadataStore, VectorIndex};
use crate::types::{
    AccumulationRun, Contradiction, ContradictionType, Fragment, Insight, InsightSource,
    WatchedProject,
};

/// Outcome of ingesting one fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// An existing insight absorbed the fragment (exact or semantic dedup).
    Updated,
    /// A new insight was created.
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathState {
    Processing,
    Cooldown,
}

/// Drives per-path accumulation.
pub struct Accumulator {
    insight_store: Arc<dyn InsightStore>,
    metadata_store: Arc<dyn MetadataStore>,
    vector_index: Arc<dyn VectorIndex>,
    embeddings: Arc<EmbeddingPool>,
    config: PipelineConfig,
    path_state: Mutex<HashMap<PathBuf, (PathState, Instant)>>,
}

impl Accumulator {
    /// Build an accumulator over the given stores, vector index, and
    /// embedding pool.
    pub fn new(
        insight_store: Arc<dyn InsightStore>,
        metadata_store: Arc<dyn MetadataStore>,
        vector_index: Arc<dyn VectorIndex>,
        embeddings: Arc<EmbeddingPool>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            insight_store,
            metadata_store,
            vector_index,
            embeddings,
            config,
            path_state: Mutex::new(HashMap::new()),
        }
    }

    fn try_enter(&self, path: &Path) -> bool {
        let mut guard = self.path_state.lock();
        match guard.get(path) {
            Some((PathState::Processing, _)) => false,
            Some((PathState::Cooldown, at)) => {
                if at.elapsed() < Duration::from_secs(self.config.accumulator_cooldown_secs) {
                    false
                } else {
                    guard.insert(path.to_path_buf(), (PathState::Processing, Instant::now()));
                    true
                }
            }
            None => {
                guard.insert(path.to_path_buf(), (PathState::Processing, Instant::now()));
                true
            }
        }
    }

    fn leave(&self, path: &Path) {
        self.path_state
            .lock()
            .insert(path.to_path_buf(), (PathState::Cooldown, Instant::now()));
    }

    /// Run the full accumulation pipeline for one file path (§4.3).
    ///
    /// Returns `Ok(None)` when the path is already processing or within its
    /// post-completion cooldown — a rejection, not an error.
    #[instrument(skip(self, parser), fields(path = %path.display()))]
    pub async fn accumulate_path(
        &self,
        path: &Path,
        parser: &dyn ContextParser,
        project_name: &str,
    ) -> Result<Option<AccumulationRun>> {
        if !self.try_enter(path) {
            debug!("accumulation rejected: path busy or cooling down");
            return Ok(None);
        }

        let result = self.accumulate_path_inner(path, parser, project_name).await;
        self.leave(path);
        result.map(Some)
    }

    async fn accumulate_path_inner(
        &self,
        path: &Path,
        parser: &dyn ContextParser,
        project_name: &str,
    ) -> Result<AccumulationRun> {
        let now = Utc::now();
        let mut run = AccumulationRun::start(path.display().to_string(), now);
        self.metadata_store.insert_accumulation_run(&run).await?;

        let path_str = path.display().to_string();
        let file_hash = match compute_file_hash(path) {
            Ok(hash) => hash,
            Err(e) => {
                run.fail(Utc::now(), e.to_string());
                self.metadata_store.update_accumulation_run(&run).await?;
                return Ok(run);
            }
        };

        let existing_project = self.metadata_store.watched_project(&path_str).await?;
        if let Some(project) = &existing_project {
            if !project.has_changed(&file_hash) {
                run.complete(Utc::now(), 0, 0, 0);
                self.metadata_store.update_accumulation_run(&run).await?;
                return Ok(run);
            }
        }

        let fragments = match parser.parse(path) {
            Ok(fragments) => fragments,
            Err(e) => {
                run.fail(Utc::now(), e.to_string());
                self.metadata_store.update_accumulation_run(&run).await?;
                return Ok(run);
            }
        };

        let mut created = 0i64;
        let mut updated = 0i64;
        for fragment in &fragments {
            match self.ingest_fragment(fragment).await {
                Ok(IngestOutcome::Created) => created += 1,
                Ok(IngestOutcome::Updated) => updated += 1,
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "fragment ingestion degraded, continuing");
                    run.errors.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        let mut project = existing_project
            .unwrap_or_else(|| WatchedProject::new(project_name.to_string(), path_str.clone()));
        project.mark_scanned(file_hash, Utc::now());
        self.metadata_store.upsert_watched_project(project).await?;

        run.complete(Utc::now(), fragments.len() as i64, created, updated);
        self.metadata_store.update_accumulation_run(&run).await?;
        Ok(run)
    }

    /// Ingest one fragment: steps A-E of §4.3.
    #[instrument(skip(self, fragment), fields(fragment_id = %fragment.id))]
    pub async fn ingest_fragment(&self, fragment: &Fragment) -> Result<IngestOutcome> {
        let now = Utc::now();
        let content_hash = content_hash(&fragment.content);

        // Step A: exact dedup.
        if let Some(existing) = self.insight_store.find_by_content_hash(&content_hash).await? {
            self.insight_store.record_observation(existing.id, now).await?;
            let source = InsightSource::from_fragment(existing.id, fragment);
            self.insight_store.insert_source(source).await?;
            return Ok(IngestOutcome::Updated);
        }

        // Step B: embedding (failures degrade to an embedding-less insight).
        let embedding = match self.embeddings.get_or_embed(&fragment.content).await {
            Ok(vector) => Some(vector),
            Err(_) => None,
        };

        // Step C: semantic dedup, only possible with an embedding.
        if let Some(vector) = &embedding {
            let neighbours = self.vector_index.nearest_insights(vector, 1, None).await?;
            if let Some((nearest_id, similarity)) = neighbours.first().copied() {
                if similarity >= self.config.semantic_threshold {
                    if let Some(nearest) = self.insight_store.get(nearest_id).await? {
                        if nearest.is_dedup_target() {
                            self.insight_store.record_observation(nearest_id, now).await?;
                            let source = InsightSource::from_fragment(nearest_id, fragment);
                            self.insight_store.insert_source(source).await?;
                            return Ok(IngestOutcome::Updated);
                        }
                    }
                }
            }
        }

        // Step D: create.
        let classification = classify_fragment(fragment);
        let insight = Insight::new_created(
            fragment.content.clone(),
            content_hash,
            embedding.clone(),
            classification.category,
            classification.tags,
            classification.domain,
            now,
        );
        let insight_id = insight.id;
        self.insight_store.insert(insight.clone()).await?;
        let source = InsightSource::from_fragment(insight_id, fragment);
        self.insight_store.insert_source(source).await?;

        // Step E: contradiction probe, new insights with an embedding only.
        if let Some(vector) = &embedding {
            self.probe_contradictions(&insight, vector).await?;
        }

        Ok(IngestOutcome::Created)
    }

    async fn probe_contradictions(&self, insight: &Insight, embedding: &[f32]) -> Result<()> {
        let neighbours = self
            .vector_index
            .nearest_insights(embedding, CONTRADICTION_PROBE_CAP, Some(insight.id))
            .await?;
        let content_lower = insight.content.to_lowercase();

        for (candidate_id, similarity) in neighbours {
            if similarity < self.config.contradiction_low || similarity > self.config.contradiction_high {
                continue;
            }
            let Some(candidate) = self.insight_store.get(candidate_id).await? else {
                continue;
            };
            let candidate_lower = candidate.content.to_lowercase();
            if !is_negation_match(&content_lower, &candidate_lower) {
                continue;
            }
            let contradiction = Contradiction::new(
                insight.id,
                candidate_id,
                ContradictionType::Direct,
                "accumulator",
                similarity,
                format!("negation heuristic matched between {} and {}", insight.id, candidate_id),
            );
            self.insight_store.insert_contradiction(contradiction).await?;
        }
        Ok(())
    }
}

fn content_hash(content: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_is_deterministic() {
        assert_eq!(content_hash("hello"), content_hash("hello"));
        assert_ne!(content_hash("hello"), content_hash("world"));
    }
}
