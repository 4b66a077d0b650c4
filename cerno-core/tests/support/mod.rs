//! An in-memory, single-process stand-in for the four storage traits, used
//! only by this crate's own integration tests. One struct implementing all
//! four traits mirrors the real backend's shape: a single handle can answer
//! cross-table questions (promotion candidates excluding derivations)
//! without a second trait call.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use cerno_core::embeddings::similarity::cosine_similarity;
use cerno_core::error::Result;
use cerno_core::store::{ClusterBuild, InsightStore, MetadataStore, PrincipleStore, PromotionQuery, ScoredHit, VectorIndex};
use cerno_core::types::{
    AccumulationRun, Cluster, Contradiction, Derivation, Insight, InsightSource, InsightStatus, Principle, PrincipleLink,
    ResolutionRun, WatchedProject,
};

#[derive(Default)]
struct Inner {
    insights: HashMap<Uuid, Insight>,
    sources: Vec<InsightSource>,
    contradictions: Vec<Contradiction>,
    clusters: Vec<Cluster>,
    cluster_members: HashMap<Uuid, Vec<Uuid>>,
    principles: HashMap<Uuid, Principle>,
    derivations: Vec<Derivation>,
    links: Vec<PrincipleLink>,
    watched_projects: HashMap<String, WatchedProject>,
    accumulation_runs: HashMap<Uuid, AccumulationRun>,
    resolution_runs: HashMap<Uuid, ResolutionRun>,
}

/// A single-process storage double implementing every storage trait over
/// plain `HashMap`s behind one mutex, standing in for a real persistence
/// backend in tests that exercise the pipeline end to end.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InsightStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Insight>> {
        Ok(self.inner.lock().unwrap().insights.get(&id).cloned())
    }

    async fn find_by_content_hash(&self, hash: &str) -> Result<Option<Insight>> {
        Ok(self.inner.lock().unwrap().insights.values().find(|i| i.content_hash == hash).cloned())
    }

    async fn insert(&self, insight: Insight) -> Result<()> {
        self.inner.lock().unwrap().insights.insert(insight.id, insight);
        Ok(())
    }

    async fn update(&self, insight: &Insight) -> Result<()> {
        self.inner.lock().unwrap().insights.insert(insight.id, insight.clone());
        Ok(())
    }

    async fn record_observation(&self, id: Uuid, seen_at: DateTime<Utc>) -> Result<()> {
        let mut guard = self.inner.lock().unwrap();
        let insight = guard
            .insights
            .get_mut(&id)
            .ok_or_else(|| cerno_core::error::Error::RowError(format!("insight {id} not found")))?;
        insight.observation_count += 1;
        if seen_at > insight.last_seen_at {
            insight.last_seen_at = seen_at;
        }
        Ok(())
    }

    async fn insert_source(&self, source: InsightSource) -> Result<()> {
        let mut guard = self.inner.lock().unwrap();
        if guard.sources.iter().any(|s| s.fragment_id == source.fragment_id) {
            return Ok(());
        }
        guard.sources.push(source);
        Ok(())
    }

    async fn sources_for(&self, insight_id: Uuid) -> Result<Vec<InsightSource>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .sources
            .iter()
            .filter(|s| s.insight_id == insight_id)
            .cloned()
            .collect())
    }

    async fn list_active_with_embeddings(&self, limit: usize) -> Result<Vec<Insight>> {
        let guard = self.inner.lock().unwrap();
        let mut out: Vec<Insight> = guard
            .insights
            .values()
            .filter(|i| i.status == InsightStatus::Active && i.embedding.is_some())
            .cloned()
            .collect();
        out.sort_by(|a, b| b.observation_count.cmp(&a.observation_count));
        out.truncate(limit);
        Ok(out)
    }

    async fn list_active(&self, limit: usize) -> Result<Vec<Insight>> {
        let guard = self.inner.lock().unwrap();
        let mut out: Vec<Insight> = guard.insights.values().filter(|i| i.status == InsightStatus::Active).cloned().collect();
        out.truncate(limit);
        Ok(out)
    }

    async fn insert_contradiction(&self, contradiction: Contradiction) -> Result<()> {
        let mut guard = self.inner.lock().unwrap();
        let exists = guard
            .contradictions
            .iter()
            .any(|c| c.insight_a_id == contradiction.insight_a_id && c.insight_b_id == contradiction.insight_b_id);
        if !exists {
            guard.contradictions.push(contradiction);
        }
        Ok(())
    }

    async fn has_unresolved_contradiction(&self, insight_id: Uuid) -> Result<bool> {
        use cerno_core::types::ResolutionStatus;
        Ok(self.inner.lock().unwrap().contradictions.iter().any(|c| {
            (c.insight_a_id == insight_id || c.insight_b_id == insight_id) && c.resolution_status == ResolutionStatus::Unresolved
        }))
    }

    async fn promotion_candidates(&self, query: PromotionQuery) -> Result<Vec<Insight>> {
        let guard = self.inner.lock().unwrap();
        let now = Utc::now();
        let derived: std::collections::HashSet<Uuid> = guard.derivations.iter().map(|d| d.insight_id).collect();
        let mut out: Vec<Insight> = guard
            .insights
            .values()
            .filter(|i| i.status == InsightStatus::Active)
            .filter(|i| i.confidence >= query.min_confidence)
            .filter(|i| i.observation_count >= query.min_observations)
            .filter(|i| (now - i.inserted_at).num_days() >= query.min_age_days)
            .filter(|i| !derived.contains(&i.id))
            .filter(|i| !guard.contradictions.iter().any(|c| {
                (c.insight_a_id == i.id || c.insight_b_id == i.id)
                    && c.resolution_status == cerno_core::types::ResolutionStatus::Unresolved
            }))
            .cloned()
            .collect();
        out.truncate(query.limit);
        Ok(out)
    }

    async fn rebuild_clusters(&self, clusters: Vec<ClusterBuild>) -> Result<()> {
        let mut guard = self.inner.lock().unwrap();
        guard.clusters.clear();
        guard.cluster_members.clear();
        for build in clusters {
            guard.cluster_members.insert(build.cluster.id, build.member_ids);
            guard.clusters.push(build.cluster);
        }
        Ok(())
    }

    async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        Ok(self.inner.lock().unwrap().clusters.clone())
    }

    async fn cluster_members(&self, cluster_id: Uuid) -> Result<Vec<Insight>> {
        let guard = self.inner.lock().unwrap();
        let Some(ids) = guard.cluster_members.get(&cluster_id) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .filter_map(|id| guard.insights.get(id))
            .filter(|i| i.status == InsightStatus::Active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PrincipleStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Principle>> {
        Ok(self.inner.lock().unwrap().principles.get(&id).cloned())
    }

    async fn find_by_content_hash(&self, hash: &str) -> Result<Option<Principle>> {
        Ok(self.inner.lock().unwrap().principles.values().find(|p| p.content_hash == hash).cloned())
    }

    async fn insert(&self, principle: Principle) -> Result<()> {
        self.inner.lock().unwrap().principles.insert(principle.id, principle);
        Ok(())
    }

    async fn update(&self, principle: &Principle) -> Result<()> {
        self.inner.lock().unwrap().principles.insert(principle.id, principle.clone());
        Ok(())
    }

    async fn insert_derivation(&self, derivation: Derivation) -> Result<()> {
        let mut guard = self.inner.lock().unwrap();
        let exists = guard
            .derivations
            .iter()
            .any(|d| d.principle_id == derivation.principle_id && d.insight_id == derivation.insight_id);
        if !exists {
            guard.derivations.push(derivation);
        }
        Ok(())
    }

    async fn insight_has_derivation(&self, insight_id: Uuid) -> Result<bool> {
        Ok(self.inner.lock().unwrap().derivations.iter().any(|d| d.insight_id == insight_id))
    }

    async fn list_live(&self, limit: usize) -> Result<Vec<Principle>> {
        let guard = self.inner.lock().unwrap();
        let mut out: Vec<Principle> = guard.principles.values().filter(|p| p.is_live()).cloned().collect();
        out.truncate(limit);
        Ok(out)
    }

    async fn list_live_with_embeddings(&self, limit: usize) -> Result<Vec<Principle>> {
        let guard = self.inner.lock().unwrap();
        let mut out: Vec<Principle> = guard.principles.values().filter(|p| p.is_live() && p.embedding.is_some()).cloned().collect();
        out.truncate(limit);
        Ok(out)
    }

    async fn insert_link(&self, link: PrincipleLink) -> Result<()> {
        let mut guard = self.inner.lock().unwrap();
        let exists = guard
            .links
            .iter()
            .any(|l| l.source_id == link.source_id && l.target_id == link.target_id && l.link_type == link.link_type);
        if !exists {
            guard.links.push(link);
        }
        Ok(())
    }

    async fn link_count(&self, principle_id: Uuid) -> Result<usize> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .links
            .iter()
            .filter(|l| l.source_id == principle_id || l.target_id == principle_id)
            .count())
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn watched_project(&self, path: &str) -> Result<Option<WatchedProject>> {
        Ok(self.inner.lock().unwrap().watched_projects.get(path).cloned())
    }

    async fn upsert_watched_project(&self, project: WatchedProject) -> Result<()> {
        self.inner.lock().unwrap().watched_projects.insert(project.path.clone(), project);
        Ok(())
    }

    async fn list_watched_projects(&self) -> Result<Vec<WatchedProject>> {
        Ok(self.inner.lock().unwrap().watched_projects.values().cloned().collect())
    }

    async fn insert_accumulation_run(&self, run: &AccumulationRun) -> Result<()> {
        self.inner.lock().unwrap().accumulation_runs.insert(run.id, run.clone());
        Ok(())
    }

    async fn update_accumulation_run(&self, run: &AccumulationRun) -> Result<()> {
        self.inner.lock().unwrap().accumulation_runs.insert(run.id, run.clone());
        Ok(())
    }

    async fn insert_resolution_run(&self, run: &ResolutionRun) -> Result<()> {
        self.inner.lock().unwrap().resolution_runs.insert(run.id, run.clone());
        Ok(())
    }

    async fn update_resolution_run(&self, run: &ResolutionRun) -> Result<()> {
        self.inner.lock().unwrap().resolution_runs.insert(run.id, run.clone());
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for MemoryStore {
    async fn nearest_insights(&self, embedding: &[f32], k: usize, exclude: Option<Uuid>) -> Result<Vec<ScoredHit>> {
        let guard = self.inner.lock().unwrap();
        let mut hits = Vec::new();
        for insight in guard.insights.values() {
            if insight.status != InsightStatus::Active || Some(insight.id) == exclude {
                continue;
            }
            let Some(candidate) = &insight.embedding else { continue };
            hits.push((insight.id, cosine_similarity(embedding, candidate)?));
        }
        hits.sort_unstable_by(|a, b| b.1.total_cmp(&a.1));
        hits.truncate(k);
        Ok(hits)
    }

    async fn nearest_principles(&self, embedding: &[f32], k: usize, exclude: Option<Uuid>) -> Result<Vec<ScoredHit>> {
        let guard = self.inner.lock().unwrap();
        let mut hits = Vec::new();
        for principle in guard.principles.values() {
            if !principle.is_live() || Some(principle.id) == exclude {
                continue;
            }
            let Some(candidate) = &principle.embedding else { continue };
            hits.push((principle.id, cosine_similarity(embedding, candidate)?));
        }
        hits.sort_unstable_by(|a, b| b.1.total_cmp(&a.1));
        hits.truncate(k);
        Ok(hits)
    }
}

/// A deterministic fake embedding provider whose vectors are supplied
/// up-front by content string, so tests can pin exact cosine similarities
/// between fragments instead of relying on a hash-derived one.
pub struct FixedEmbeddingProvider {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    dimension: usize,
}

impl FixedEmbeddingProvider {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: Mutex::new(HashMap::new()),
            dimension,
        }
    }

    pub fn set(&self, content: &str, vector: Vec<f32>) {
        self.vectors.lock().unwrap().insert(content.to_string(), vector);
    }
}

#[async_trait]
impl cerno_core::embeddings::provider::EmbeddingProvider for FixedEmbeddingProvider {
    async fn embed(&self, content: &str) -> Result<Vec<f32>> {
        self.vectors
            .lock()
            .unwrap()
            .get(content)
            .cloned()
            .ok_or_else(|| cerno_core::error::Error::Provider(format!("no fixed vector registered for {content:?}")))
    }

    async fn embed_batch(&self, contents: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(contents.len());
        for content in contents {
            out.push(self.embed(content).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
