//! [`InsightStore`] implementation backed by redb.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use uuid::Uuid;

use cerno_core::error::{Error, Result};
use cerno_core::store::{ClusterBuild, InsightStore, PromotionQuery};
use cerno_core::types::{Cluster, Contradiction, Insight, InsightSource, InsightStatus, ResolutionStatus};

use crate::tables::{CLUSTERS_TABLE, CLUSTER_MEMBERS_TABLE, CONTRADICTIONS_TABLE, DERIVATIONS_TABLE, INSIGHTS_TABLE, INSIGHT_SOURCES_TABLE};
use crate::{deserialize, run_blocking, serialize, RedbStore};

#[async_trait]
impl InsightStore for RedbStore {
    async fn get(&self, id: Uuid) -> Result<Option<Insight>> {
        let key = id.to_string();
        run_blocking(&self.db, move |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(INSIGHTS_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open insights table: {e}")))?;
            match table.get(key.as_str()).map_err(|e| Error::Storage(format!("failed to get insight: {e}")))? {
                Some(bytes) => Ok(Some(deserialize(bytes.value())?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn find_by_content_hash(&self, hash: &str) -> Result<Option<Insight>> {
        let hash = hash.to_string();
        run_blocking(&self.db, move |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(INSIGHTS_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open insights table: {e}")))?;
            let iter = table.iter().map_err(|e| Error::Storage(format!("failed to iterate insights: {e}")))?;
            for row in iter {
                let (_, bytes) = row.map_err(|e| Error::Storage(format!("failed to read insight row: {e}")))?;
                let insight: Insight = deserialize(bytes.value())?;
                if insight.content_hash == hash {
                    return Ok(Some(insight));
                }
            }
            Ok(None)
        })
        .await
    }

    async fn insert(&self, insight: Insight) -> Result<()> {
        let key = insight.id.to_string();
        let bytes = serialize(&insight)?;
        run_blocking(&self.db, move |db| {
            let write_txn = db.begin_write().map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                let mut table = write_txn
                    .open_table(INSIGHTS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open insights table: {e}")))?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .map_err(|e| Error::Storage(format!("failed to insert insight: {e}")))?;
            }
            write_txn.commit().map_err(|e| Error::Storage(format!("failed to commit transaction: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, insight: &Insight) -> Result<()> {
        self.insert(insight.clone()).await
    }

    async fn record_observation(&self, id: Uuid, seen_at: DateTime<Utc>) -> Result<()> {
        let Some(mut insight) = self.get(id).await? else {
            return Err(Error::RowError(format!("insight {id} not found")));
        };
        insight.observation_count += 1;
        insight.last_seen_at = insight.last_seen_at.max(seen_at);
        self.update(&insight).await
    }

    async fn insert_source(&self, source: InsightSource) -> Result<()> {
        let key = source.fragment_id.clone();
        let bytes = serialize(&source)?;
        run_blocking(&self.db, move |db| {
            let write_txn = db.begin_write().map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                let mut table = write_txn
                    .open_table(INSIGHT_SOURCES_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open insight_sources table: {e}")))?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .map_err(|e| Error::Storage(format!("failed to insert insight source: {e}")))?;
            }
            write_txn.commit().map_err(|e| Error::Storage(format!("failed to commit transaction: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn sources_for(&self, insight_id: Uuid) -> Result<Vec<InsightSource>> {
        run_blocking(&self.db, move |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(INSIGHT_SOURCES_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open insight_sources table: {e}")))?;
            let iter = table.iter().map_err(|e| Error::Storage(format!("failed to iterate insight_sources: {e}")))?;
            let mut out = Vec::new();
            for row in iter {
                let (_, bytes) = row.map_err(|e| Error::Storage(format!("failed to read insight_source row: {e}")))?;
                let source: InsightSource = deserialize(bytes.value())?;
                if source.insight_id == insight_id {
                    out.push(source);
                }
            }
            Ok(out)
        })
        .await
    }

    async fn list_active_with_embeddings(&self, limit: usize) -> Result<Vec<Insight>> {
        let mut insights = self.list_all_insights().await?;
        insights.retain(|i| i.status == InsightStatus::Active && i.embedding.is_some());
        insights.sort_unstable_by(|a, b| b.observation_count.cmp(&a.observation_count));
        insights.truncate(limit);
        Ok(insights)
    }

    async fn list_active(&self, limit: usize) -> Result<Vec<Insight>> {
        let mut insights = self.list_all_insights().await?;
        insights.retain(|i| i.status == InsightStatus::Active);
        insights.truncate(limit);
        Ok(insights)
    }

    async fn insert_contradiction(&self, contradiction: Contradiction) -> Result<()> {
        let key = format!("{}:{}", contradiction.insight_a_id, contradiction.insight_b_id);
        let bytes = serialize(&contradiction)?;
        run_blocking(&self.db, move |db| {
            let write_txn = db.begin_write().map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                let mut table = write_txn
                    .open_table(CONTRADICTIONS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open contradictions table: {e}")))?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .map_err(|e| Error::Storage(format!("failed to insert contradiction: {e}")))?;
            }
            write_txn.commit().map_err(|e| Error::Storage(format!("failed to commit transaction: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn has_unresolved_contradiction(&self, insight_id: Uuid) -> Result<bool> {
        run_blocking(&self.db, move |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(CONTRADICTIONS_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open contradictions table: {e}")))?;
            let iter = table.iter().map_err(|e| Error::Storage(format!("failed to iterate contradictions: {e}")))?;
            for row in iter {
                let (_, bytes) = row.map_err(|e| Error::Storage(format!("failed to read contradiction row: {e}")))?;
                let contradiction: Contradiction = deserialize(bytes.value())?;
                let involved = contradiction.insight_a_id == insight_id || contradiction.insight_b_id == insight_id;
                if involved && contradiction.resolution_status == ResolutionStatus::Unresolved {
                    return Ok(true);
                }
            }
            Ok(false)
        })
        .await
    }

    async fn promotion_candidates(&self, query: PromotionQuery) -> Result<Vec<Insight>> {
        let derived_ids = self.derived_insight_ids().await?;
        let now = Utc::now();
        let mut insights = self.list_all_insights().await?;
        insights.retain(|insight| {
            insight.status == InsightStatus::Active
                && insight.confidence >= query.min_confidence
                && insight.observation_count >= query.min_observations
                && (now - insight.inserted_at).num_days() >= query.min_age_days
                && !derived_ids.contains(&insight.id)
        });
        let mut out = Vec::with_capacity(insights.len().min(query.limit));
        for insight in insights {
            if out.len() >= query.limit {
                break;
            }
            if self.has_unresolved_contradiction(insight.id).await? {
                continue;
            }
            out.push(insight);
        }
        Ok(out)
    }

    async fn rebuild_clusters(&self, clusters: Vec<ClusterBuild>) -> Result<()> {
        let mut rows = Vec::with_capacity(clusters.len());
        for build in clusters {
            let cluster_key = build.cluster.id.to_string();
            let cluster_bytes = serialize(&build.cluster)?;
            let member_keys: Vec<String> = build
                .member_ids
                .iter()
                .map(|id| format!("{}:{}", build.cluster.id, id))
                .collect();
            rows.push((cluster_key, cluster_bytes, member_keys));
        }

        run_blocking(&self.db, move |db| {
            let write_txn = db.begin_write().map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                let mut clusters_table = write_txn
                    .open_table(CLUSTERS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open clusters table: {e}")))?;
                let keys: Vec<String> = clusters_table
                    .iter()
                    .map_err(|e| Error::Storage(format!("failed to iterate clusters: {e}")))?
                    .map(|row| row.map(|(k, _)| k.value().to_string()))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| Error::Storage(format!("failed to read cluster row: {e}")))?;
                for key in keys {
                    clusters_table
                        .remove(key.as_str())
                        .map_err(|e| Error::Storage(format!("failed to remove cluster: {e}")))?;
                }
                for (key, bytes, _) in &rows {
                    clusters_table
                        .insert(key.as_str(), bytes.as_slice())
                        .map_err(|e| Error::Storage(format!("failed to insert cluster: {e}")))?;
                }
            }
            {
                let mut members_table = write_txn
                    .open_table(CLUSTER_MEMBERS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open cluster_members table: {e}")))?;
                let keys: Vec<String> = members_table
                    .iter()
                    .map_err(|e| Error::Storage(format!("failed to iterate cluster_members: {e}")))?
                    .map(|row| row.map(|(k, _)| k.value().to_string()))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| Error::Storage(format!("failed to read cluster_member row: {e}")))?;
                for key in keys {
                    members_table
                        .remove(key.as_str())
                        .map_err(|e| Error::Storage(format!("failed to remove cluster_member: {e}")))?;
                }
                for (_, _, member_keys) in &rows {
                    for member_key in member_keys {
                        members_table
                            .insert(member_key.as_str(), &[][..])
                            .map_err(|e| Error::Storage(format!("failed to insert cluster_member: {e}")))?;
                    }
                }
            }
            write_txn.commit().map_err(|e| Error::Storage(format!("failed to commit transaction: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        run_blocking(&self.db, |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(CLUSTERS_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open clusters table: {e}")))?;
            let iter = table.iter().map_err(|e| Error::Storage(format!("failed to iterate clusters: {e}")))?;
            let mut out = Vec::new();
            for row in iter {
                let (_, bytes) = row.map_err(|e| Error::Storage(format!("failed to read cluster row: {e}")))?;
                out.push(deserialize(bytes.value())?);
            }
            Ok(out)
        })
        .await
    }

    async fn cluster_members(&self, cluster_id: Uuid) -> Result<Vec<Insight>> {
        let prefix = format!("{cluster_id}:");
        let member_ids: Vec<Uuid> = run_blocking(&self.db, move |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(CLUSTER_MEMBERS_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open cluster_members table: {e}")))?;
            let iter = table.iter().map_err(|e| Error::Storage(format!("failed to iterate cluster_members: {e}")))?;
            let mut ids = Vec::new();
            for row in iter {
                let (key, _) = row.map_err(|e| Error::Storage(format!("failed to read cluster_member row: {e}")))?;
                if let Some(insight_id) = key.value().strip_prefix(&prefix) {
                    if let Ok(id) = insight_id.parse::<Uuid>() {
                        ids.push(id);
                    }
                }
            }
            Ok(ids)
        })
        .await?;

        let mut members = Vec::with_capacity(member_ids.len());
        for id in member_ids {
            if let Some(insight) = self.get(id).await? {
                if insight.status == InsightStatus::Active {
                    members.push(insight);
                }
            }
        }
        Ok(members)
    }
}

impl RedbStore {
    pub(crate) async fn list_all_insights(&self) -> Result<Vec<Insight>> {
        run_blocking(&self.db, |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(INSIGHTS_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open insights table: {e}")))?;
            let iter = table.iter().map_err(|e| Error::Storage(format!("failed to iterate insights: {e}")))?;
            let mut out = Vec::new();
            for row in iter {
                let (_, bytes) = row.map_err(|e| Error::Storage(format!("failed to read insight row: {e}")))?;
                out.push(deserialize(bytes.value())?);
            }
            Ok(out)
        })
        .await
    }

    async fn derived_insight_ids(&self) -> Result<std::collections::HashSet<Uuid>> {
        run_blocking(&self.db, |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(DERIVATIONS_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open derivations table: {e}")))?;
            let iter = table.iter().map_err(|e| Error::Storage(format!("failed to iterate derivations: {e}")))?;
            let mut out = std::collections::HashSet::new();
            for row in iter {
                let (_, bytes) = row.map_err(|e| Error::Storage(format!("failed to read derivation row: {e}")))?;
                let derivation: cerno_core::types::Derivation = deserialize(bytes.value())?;
                out.insert(derivation.insight_id);
            }
            Ok(out)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn store() -> RedbStore {
        let dir = tempfile::tempdir().unwrap();
        RedbStore::open(&dir.path().join("cerno.redb")).await.unwrap()
    }

    fn insight(content: &str) -> Insight {
        Insight::new_created(
            content.into(),
            format!("hash-{content}"),
            Some(vec![1.0, 0.0]),
            cerno_core::types::InsightCategory::Fact,
            HashSet::new(),
            None,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_and_get_roundtrips() {
        let store = store().await;
        let insight = insight("a");
        store.insert(insight.clone()).await.unwrap();
        let fetched = store.get(insight.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "a");
    }

    #[tokio::test]
    async fn find_by_content_hash_finds_existing() {
        let store = store().await;
        let insight = insight("b");
        store.insert(insight.clone()).await.unwrap();
        let found = store.find_by_content_hash(&insight.content_hash).await.unwrap();
        assert!(found.is_some());
        assert!(store.find_by_content_hash("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn record_observation_increments_and_advances_last_seen() {
        let store = store().await;
        let insight = insight("c");
        let original_last_seen = insight.last_seen_at;
        store.insert(insight.clone()).await.unwrap();
        let later = original_last_seen + chrono::Duration::hours(1);
        store.record_observation(insight.id, later).await.unwrap();
        let updated = store.get(insight.id).await.unwrap().unwrap();
        assert_eq!(updated.observation_count, 2);
        assert_eq!(updated.last_seen_at, later);
    }

    #[tokio::test]
    async fn contradiction_marks_insight_unresolved() {
        let store = store().await;
        let a = insight("a");
        let b = insight("b");
        store.insert(a.clone()).await.unwrap();
        store.insert(b.clone()).await.unwrap();
        assert!(!store.has_unresolved_contradiction(a.id).await.unwrap());
        let contradiction = Contradiction::new(a.id, b.id, cerno_core::types::ContradictionType::Direct, "accumulator", 0.6, "negation".into());
        store.insert_contradiction(contradiction).await.unwrap();
        assert!(store.has_unresolved_contradiction(a.id).await.unwrap());
        assert!(store.has_unresolved_contradiction(b.id).await.unwrap());
    }
}
