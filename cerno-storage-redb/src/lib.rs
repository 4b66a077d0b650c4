//! Embedded redb storage backend implementing the Cerno pipeline's storage
//! traits. A single-file, zero-server database standing in for the
//! relational store a hosted deployment would use, with nearest-neighbour
//! search done as a bounded linear cosine scan rather than an index
//! structure.

mod insights;
mod metadata;
mod principles;
mod tables;
mod vector_index;

use std::path::Path;
use std::sync::Arc;

use cerno_core::error::{Error, Result};
use redb::Database;
use tracing::info;

use tables::{
    ACCUMULATION_RUNS_TABLE, CLUSTERS_TABLE, CLUSTER_MEMBERS_TABLE, CONTRADICTIONS_TABLE, DERIVATIONS_TABLE,
    INSIGHTS_TABLE, INSIGHT_SOURCES_TABLE, LINKS_TABLE, PRINCIPLES_TABLE, RESOLUTION_RUNS_TABLE,
    WATCHED_PROJECTS_TABLE,
};

/// Handle to an open redb database, shared by every trait implementation in
/// this crate.
pub struct RedbStore {
    pub(crate) db: Arc<Database>,
}

impl RedbStore {
    /// Open (creating if absent) the database at `path` and ensure every
    /// table exists.
    pub async fn open(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "opening redb store");
        let path_buf = path.to_path_buf();
        let db = tokio::task::spawn_blocking(move || {
            Database::create(&path_buf).map_err(|e| Error::Storage(format!("failed to open database: {e}")))
        })
        .await
        .map_err(|e| Error::Storage(format!("task join error: {e}")))??;

        let store = Self { db: Arc::new(db) };
        store.initialize_tables().await?;
        Ok(store)
    }

    async fn initialize_tables(&self) -> Result<()> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let write_txn = db
                .begin_write()
                .map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                write_txn
                    .open_table(INSIGHTS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open insights table: {e}")))?;
                write_txn
                    .open_table(INSIGHT_SOURCES_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open insight_sources table: {e}")))?;
                write_txn
                    .open_table(CONTRADICTIONS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open contradictions table: {e}")))?;
                write_txn
                    .open_table(CLUSTERS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open clusters table: {e}")))?;
                write_txn
                    .open_table(CLUSTER_MEMBERS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open cluster_members table: {e}")))?;
                write_txn
                    .open_table(PRINCIPLES_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open principles table: {e}")))?;
                write_txn
                    .open_table(DERIVATIONS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open derivations table: {e}")))?;
                write_txn
                    .open_table(LINKS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open links table: {e}")))?;
                write_txn
                    .open_table(WATCHED_PROJECTS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open watched_projects table: {e}")))?;
                write_txn
                    .open_table(ACCUMULATION_RUNS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open accumulation_runs table: {e}")))?;
                write_txn
                    .open_table(RESOLUTION_RUNS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open resolution_runs table: {e}")))?;
            }
            write_txn
                .commit()
                .map_err(|e| Error::Storage(format!("failed to commit transaction: {e}")))?;
            Ok::<(), Error>(())
        })
        .await
        .map_err(|e| Error::Storage(format!("task join error: {e}")))??;
        Ok(())
    }
}

/// Run a blocking redb operation on the blocking thread pool, flattening the
/// join error into the same [`Error::Storage`] variant as the database
/// errors it wraps.
pub(crate) async fn run_blocking<T, F>(db: &Arc<Database>, f: F) -> Result<T>
where
    F: FnOnce(&Database) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| Error::Storage(format!("task join error: {e}")))?
}

pub(crate) fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    postcard::to_allocvec(value).map_err(|e| Error::Storage(format!("serialization failed: {e}")))
}

pub(crate) fn deserialize<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    postcard::from_bytes(bytes).map_err(|e| Error::Storage(format!("deserialization failed: {e}")))
}
