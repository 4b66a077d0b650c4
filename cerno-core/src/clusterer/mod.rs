//! Connected-component clustering of the active insight-similarity graph,
//! plus the intra-cluster dedup and cross-cluster contradiction passes that
//! run against the rebuilt clusters.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::embeddings::similarity::cosine_similarity;
use crate::error::Result;
use crate::negation::is_negation_match;
use crate::store::{ClusterBuild, InsightStore, VectorIndex};
use crate::types::{Cluster, Contradiction, ContradictionType, Insight, InsightStatus};
use crate::constants::CLUSTER_LOAD_CAP;

/// Rebuilds the cluster graph and runs the hygiene passes that depend on it.
pub struct Clusterer {
    insight_store: Arc<dyn InsightStore>,
    vector_index: Arc<dyn VectorIndex>,
    config: PipelineConfig,
}

/// Summary of one reconciliation's clustering + dedup + contradiction work.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClusterRunStats {
    /// Clusters persisted.
    pub clusters_created: usize,
    /// Insights transitioned to `superseded` by intra-cluster dedup.
    pub insights_superseded: usize,
    /// Contradictions inserted by the cross-cluster scan.
    pub contradictions_found: usize,
}

impl Clusterer {
    /// Build a clusterer over the given insight store and vector index.
    #[must_use]
    pub fn new(insight_store: Arc<dyn InsightStore>, vector_index: Arc<dyn VectorIndex>, config: PipelineConfig) -> Self {
        Self {
            insight_store,
            vector_index,
            config,
        }
    }

    /// Full reconciliation clustering pipeline: load, build the similarity
    /// graph, find connected components, persist the rebuilt clusters, then
    /// run intra-cluster dedup and cross-cluster contradiction detection.
    pub async fn run(&self) -> Result<ClusterRunStats> {
        let insights = self.insight_store.list_active_with_embeddings(CLUSTER_LOAD_CAP).await?;
        if insights.len() == CLUSTER_LOAD_CAP {
            warn!(cap = CLUSTER_LOAD_CAP, "clustering load cap reached");
        }
        if insights.is_empty() {
            return Ok(ClusterRunStats::default());
        }

        let by_id: HashMap<Uuid, &Insight> = insights.iter().map(|i| (i.id, i)).collect();
        let adjacency = self.build_adjacency(&insights).await?;
        let components = connected_components(&insights.iter().map(|i| i.id).collect::<Vec<_>>(), &adjacency);

        let mut builds = Vec::with_capacity(components.len());
        let mut cluster_members: Vec<Vec<Uuid>> = Vec::with_capacity(components.len());
        for (idx, component) in components.iter().enumerate() {
            let embeddings: Vec<Vec<f32>> = component
                .iter()
                .filter_map(|id| by_id.get(id).and_then(|i| i.embedding.clone()))
                .collect();
            let cluster = Cluster::from_members(format!("cluster-{}", idx + 1), &embeddings);
            builds.push(ClusterBuild {
                cluster,
                member_ids: component.clone(),
            });
            cluster_members.push(component.clone());
        }

        let clusters_created = builds.len();
        self.insight_store.rebuild_clusters(builds).await?;

        let mut stats = ClusterRunStats {
            clusters_created,
            ..Default::default()
        };

        for component in &cluster_members {
            let members: Vec<Insight> = component
                .iter()
                .filter_map(|id| by_id.get(id).map(|i| (*i).clone()))
                .collect();
            stats.insights_superseded += self.dedup_cluster(members).await?;
        }

        stats.contradictions_found = self.cross_cluster_contradictions(&cluster_members, &by_id).await?;

        Ok(stats)
    }

    async fn build_adjacency(&self, insights: &[Insight]) -> Result<HashMap<Uuid, HashSet<Uuid>>> {
        let mut adjacency: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
        for insight in insights {
            let Some(embedding) = &insight.embedding else {
                continue;
            };
            let neighbours = self
                .vector_index
                .nearest_insights(embedding, crate::constants::CLUSTER_NEIGHBOUR_CAP, Some(insight.id))
                .await?;
            for (neighbour_id, similarity) in neighbours {
                if similarity < self.config.cluster_threshold {
                    continue;
                }
                adjacency.entry(insight.id).or_default().insert(neighbour_id);
                adjacency.entry(neighbour_id).or_default().insert(insight.id);
            }
        }
        Ok(adjacency)
    }

    /// Intra-cluster deduplication: winners absorb losers at or below their
    /// observation count with pairwise cosine at/above `cluster_threshold`.
    async fn dedup_cluster(&self, mut members: Vec<Insight>) -> Result<usize> {
        members.sort_by(|a, b| b.observation_count.cmp(&a.observation_count));
        let mut superseded: HashSet<Uuid> = HashSet::new();
        let mut superseded_count = 0usize;

        for i in 0..members.len() {
            let winner_id = members[i].id;
            if superseded.contains(&winner_id) {
                continue;
            }
            let (winner_embedding, winner_observation_count) =
                (members[i].embedding.clone(), members[i].observation_count);
            let Some(winner_embedding) = winner_embedding else {
                continue;
            };

            let mut absorbed_count = 0i64;
            let mut max_last_seen = members[i].last_seen_at;

            for j in (i + 1)..members.len() {
                let candidate_id = members[j].id;
                if superseded.contains(&candidate_id) {
                    continue;
                }
                if members[j].observation_count > winner_observation_count {
                    continue;
                }
                let Some(candidate_embedding) = &members[j].embedding else {
                    continue;
                };
                let similarity = cosine_similarity(&winner_embedding, candidate_embedding)?;
                if similarity < self.config.cluster_threshold {
                    continue;
                }

                absorbed_count += members[j].observation_count;
                if members[j].last_seen_at > max_last_seen {
                    max_last_seen = members[j].last_seen_at;
                }
                let mut loser = members[j].clone();
                loser.status = InsightStatus::Superseded;
                self.insight_store.update(&loser).await?;
                superseded.insert(candidate_id);
                superseded_count += 1;
            }

            if absorbed_count > 0 {
                let mut winner = members[i].clone();
                winner.observation_count += absorbed_count;
                winner.last_seen_at = max_last_seen;
                self.insight_store.update(&winner).await?;
            }
        }

        Ok(superseded_count)
    }

    /// Cross-cluster contradiction scan: for cluster pairs whose centroids
    /// fall in the contradiction window, cross the active members and record
    /// contradictions for pairs whose pairwise similarity also falls in the
    /// window.
    async fn cross_cluster_contradictions(
        &self,
        cluster_members: &[Vec<Uuid>],
        by_id: &HashMap<Uuid, &Insight>,
    ) -> Result<usize> {
        let mut found = 0usize;
        let centroids: Vec<Vec<f32>> = cluster_members
            .iter()
            .map(|ids| {
                let embeddings: Vec<Vec<f32>> = ids
                    .iter()
                    .filter_map(|id| by_id.get(id).and_then(|i| i.embedding.clone()))
                    .collect();
                crate::embeddings::similarity::centroid(&embeddings)
            })
            .collect();

        for a in 0..cluster_members.len() {
            for b in (a + 1)..cluster_members.len() {
                if centroids[a].is_empty() || centroids[b].is_empty() {
                    continue;
                }
                let Ok(centroid_sim) = cosine_similarity(&centroids[a], &centroids[b]) else {
                    continue;
                };
                if centroid_sim < self.config.contradiction_low || centroid_sim > self.config.contradiction_high {
                    continue;
                }

                for id_a in &cluster_members[a] {
                    let Some(insight_a) = by_id.get(id_a).filter(|i| i.status == InsightStatus::Active) else {
                        continue;
                    };
                    let Some(embedding_a) = &insight_a.embedding else {
                        continue;
                    };
                    for id_b in &cluster_members[b] {
                        let Some(insight_b) = by_id.get(id_b).filter(|i| i.status == InsightStatus::Active) else {
                            continue;
                        };
                        let Some(embedding_b) = &insight_b.embedding else {
                            continue;
                        };
                        let Ok(pair_sim) = cosine_similarity(embedding_a, embedding_b) else {
                            continue;
                        };
                        if pair_sim < self.config.contradiction_low || pair_sim > self.config.contradiction_high {
                            continue;
                        }

                        let negation = is_negation_match(
                            &insight_a.content.to_lowercase(),
                            &insight_b.content.to_lowercase(),
                        );
                        let contradiction_type = if negation {
                            ContradictionType::Direct
                        } else {
                            ContradictionType::Partial
                        };
                        let contradiction = Contradiction::new(
                            insight_a.id,
                            insight_b.id,
                            contradiction_type,
                            "clusterer",
                            pair_sim,
                            "cross-cluster centroid window match".to_string(),
                        );
                        self.insight_store.insert_contradiction(contradiction).await?;
                        found += 1;
                    }
                }
            }
        }
        Ok(found)
    }
}

/// Breadth-first connected components over a symmetric adjacency map.
fn connected_components(ids: &[Uuid], adjacency: &HashMap<Uuid, HashSet<Uuid>>) -> Vec<Vec<Uuid>> {
    let mut visited: HashSet<Uuid> = HashSet::new();
    let mut components = Vec::new();

    for &id in ids {
        if visited.contains(&id) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(id);
        visited.insert(id);

        while let Some(current) = queue.pop_front() {
            component.push(current);
            if let Some(neighbours) = adjacency.get(&current) {
                for &neighbour in neighbours {
                    if visited.insert(neighbour) {
                        queue.push_back(neighbour);
                    }
                }
            }
        }
        components.push(component);
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolated_nodes_form_singleton_components() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let components = connected_components(&[a, b], &HashMap::new());
        assert_eq!(components.len(), 2);
    }

    #[test]
    fn connected_nodes_form_one_component() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let mut adjacency: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
        adjacency.entry(a).or_default().insert(b);
        adjacency.entry(b).or_default().insert(a);
        let components = connected_components(&[a, b, c], &adjacency);
        assert_eq!(components.len(), 2);
        assert!(components.iter().any(|c| c.len() == 2));
    }
}
