//! [`MetadataStore`] implementation backed by redb.

use async_trait::async_trait;
use redb::{ReadableDatabase, ReadableTable};

use cerno_core::error::{Error, Result};
use cerno_core::store::MetadataStore;
use cerno_core::types::{AccumulationRun, ResolutionRun, WatchedProject};

use crate::tables::{ACCUMULATION_RUNS_TABLE, RESOLUTION_RUNS_TABLE, WATCHED_PROJECTS_TABLE};
use crate::{deserialize, run_blocking, serialize, RedbStore};

#[async_trait]
impl MetadataStore for RedbStore {
    async fn watched_project(&self, path: &str) -> Result<Option<WatchedProject>> {
        let key = path.to_string();
        run_blocking(&self.db, move |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(WATCHED_PROJECTS_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open watched_projects table: {e}")))?;
            match table.get(key.as_str()).map_err(|e| Error::Storage(format!("failed to get watched project: {e}")))? {
                Some(bytes) => Ok(Some(deserialize(bytes.value())?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn upsert_watched_project(&self, project: WatchedProject) -> Result<()> {
        let key = project.path.clone();
        let bytes = serialize(&project)?;
        run_blocking(&self.db, move |db| {
            let write_txn = db.begin_write().map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                let mut table = write_txn
                    .open_table(WATCHED_PROJECTS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open watched_projects table: {e}")))?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .map_err(|e| Error::Storage(format!("failed to insert watched project: {e}")))?;
            }
            write_txn.commit().map_err(|e| Error::Storage(format!("failed to commit transaction: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn list_watched_projects(&self) -> Result<Vec<WatchedProject>> {
        run_blocking(&self.db, |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(WATCHED_PROJECTS_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open watched_projects table: {e}")))?;
            let iter = table.iter().map_err(|e| Error::Storage(format!("failed to iterate watched_projects: {e}")))?;
            let mut out = Vec::new();
            for row in iter {
                let (_, bytes) = row.map_err(|e| Error::Storage(format!("failed to read watched_project row: {e}")))?;
                out.push(deserialize(bytes.value())?);
            }
            Ok(out)
        })
        .await
    }

    async fn insert_accumulation_run(&self, run: &AccumulationRun) -> Result<()> {
        let key = run.id.to_string();
        let bytes = serialize(run)?;
        run_blocking(&self.db, move |db| {
            let write_txn = db.begin_write().map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                let mut table = write_txn
                    .open_table(ACCUMULATION_RUNS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open accumulation_runs table: {e}")))?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .map_err(|e| Error::Storage(format!("failed to insert accumulation run: {e}")))?;
            }
            write_txn.commit().map_err(|e| Error::Storage(format!("failed to commit transaction: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn update_accumulation_run(&self, run: &AccumulationRun) -> Result<()> {
        self.insert_accumulation_run(run).await
    }

    async fn insert_resolution_run(&self, run: &ResolutionRun) -> Result<()> {
        let key = run.id.to_string();
        let bytes = serialize(run)?;
        run_blocking(&self.db, move |db| {
            let write_txn = db.begin_write().map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                let mut table = write_txn
                    .open_table(RESOLUTION_RUNS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open resolution_runs table: {e}")))?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .map_err(|e| Error::Storage(format!("failed to insert resolution run: {e}")))?;
            }
            write_txn.commit().map_err(|e| Error::Storage(format!("failed to commit transaction: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn update_resolution_run(&self, run: &ResolutionRun) -> Result<()> {
        self.insert_resolution_run(run).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn store() -> RedbStore {
        let dir = tempfile::tempdir().unwrap();
        RedbStore::open(&dir.path().join("cerno.redb")).await.unwrap()
    }

    #[tokio::test]
    async fn watched_project_roundtrips() {
        let store = store().await;
        let project = WatchedProject::new("demo".into(), "/p".into());
        store.upsert_watched_project(project.clone()).await.unwrap();
        let fetched = store.watched_project("/p").await.unwrap().unwrap();
        assert_eq!(fetched.name, "demo");
        assert!(store.watched_project("/missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_watched_projects_returns_every_row() {
        let store = store().await;
        store.upsert_watched_project(WatchedProject::new("a".into(), "/a".into())).await.unwrap();
        store.upsert_watched_project(WatchedProject::new("b".into(), "/b".into())).await.unwrap();
        let mut names: Vec<String> = store.list_watched_projects().await.unwrap().into_iter().map(|p| p.name).collect();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn accumulation_run_updates_in_place() {
        let store = store().await;
        let mut run = AccumulationRun::start("/p/notes.md".into(), Utc::now());
        store.insert_accumulation_run(&run).await.unwrap();
        run.complete(Utc::now(), 3, 2, 1);
        store.update_accumulation_run(&run).await.unwrap();
    }

    #[tokio::test]
    async fn resolution_run_updates_in_place() {
        let store = store().await;
        let mut run = ResolutionRun::start("/p/AGENTS.md".into(), "default".into(), Utc::now());
        store.insert_resolution_run(&run).await.unwrap();
        run.complete(Utc::now(), 4, 1);
        store.update_resolution_run(&run).await.unwrap();
    }
}
