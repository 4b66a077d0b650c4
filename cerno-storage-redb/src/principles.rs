//! [`PrincipleStore`] implementation backed by redb.

use async_trait::async_trait;
use redb::{ReadableDatabase, ReadableTable};
use uuid::Uuid;

use cerno_core::error::{Error, Result};
use cerno_core::store::PrincipleStore;
use cerno_core::types::{Derivation, Principle, PrincipleLink};

use crate::tables::{DERIVATIONS_TABLE, LINKS_TABLE, PRINCIPLES_TABLE};
use crate::{deserialize, run_blocking, serialize, RedbStore};

#[async_trait]
impl PrincipleStore for RedbStore {
    async fn get(&self, id: Uuid) -> Result<Option<Principle>> {
        let key = id.to_string();
        run_blocking(&self.db, move |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(PRINCIPLES_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open principles table: {e}")))?;
            match table.get(key.as_str()).map_err(|e| Error::Storage(format!("failed to get principle: {e}")))? {
                Some(bytes) => Ok(Some(deserialize(bytes.value())?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn find_by_content_hash(&self, hash: &str) -> Result<Option<Principle>> {
        let principles = self.list_all_principles().await?;
        Ok(principles.into_iter().find(|p| p.content_hash == hash))
    }

    async fn insert(&self, principle: Principle) -> Result<()> {
        let key = principle.id.to_string();
        let bytes = serialize(&principle)?;
        run_blocking(&self.db, move |db| {
            let write_txn = db.begin_write().map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                let mut table = write_txn
                    .open_table(PRINCIPLES_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open principles table: {e}")))?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .map_err(|e| Error::Storage(format!("failed to insert principle: {e}")))?;
            }
            write_txn.commit().map_err(|e| Error::Storage(format!("failed to commit transaction: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, principle: &Principle) -> Result<()> {
        self.insert(principle.clone()).await
    }

    async fn insert_derivation(&self, derivation: Derivation) -> Result<()> {
        let key = format!("{}:{}", derivation.principle_id, derivation.insight_id);
        let bytes = serialize(&derivation)?;
        run_blocking(&self.db, move |db| {
            let write_txn = db.begin_write().map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                let mut table = write_txn
                    .open_table(DERIVATIONS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open derivations table: {e}")))?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .map_err(|e| Error::Storage(format!("failed to insert derivation: {e}")))?;
            }
            write_txn.commit().map_err(|e| Error::Storage(format!("failed to commit transaction: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn insight_has_derivation(&self, insight_id: Uuid) -> Result<bool> {
        run_blocking(&self.db, move |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(DERIVATIONS_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open derivations table: {e}")))?;
            let iter = table.iter().map_err(|e| Error::Storage(format!("failed to iterate derivations: {e}")))?;
            for row in iter {
                let (_, bytes) = row.map_err(|e| Error::Storage(format!("failed to read derivation row: {e}")))?;
                let derivation: Derivation = deserialize(bytes.value())?;
                if derivation.insight_id == insight_id {
                    return Ok(true);
                }
            }
            Ok(false)
        })
        .await
    }

    async fn list_live(&self, limit: usize) -> Result<Vec<Principle>> {
        let mut principles = self.list_all_principles().await?;
        principles.retain(Principle::is_live);
        principles.truncate(limit);
        Ok(principles)
    }

    async fn list_live_with_embeddings(&self, limit: usize) -> Result<Vec<Principle>> {
        let mut principles = self.list_all_principles().await?;
        principles.retain(|p| p.is_live() && p.embedding.is_some());
        principles.truncate(limit);
        Ok(principles)
    }

    async fn insert_link(&self, link: PrincipleLink) -> Result<()> {
        let key = format!("{}:{}:{}", link.source_id, link.target_id, link.link_type);
        let bytes = serialize(&link)?;
        run_blocking(&self.db, move |db| {
            let write_txn = db.begin_write().map_err(|e| Error::Storage(format!("failed to begin write transaction: {e}")))?;
            {
                let mut table = write_txn
                    .open_table(LINKS_TABLE)
                    .map_err(|e| Error::Storage(format!("failed to open links table: {e}")))?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .map_err(|e| Error::Storage(format!("failed to insert link: {e}")))?;
            }
            write_txn.commit().map_err(|e| Error::Storage(format!("failed to commit transaction: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn link_count(&self, principle_id: Uuid) -> Result<usize> {
        run_blocking(&self.db, move |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(LINKS_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open links table: {e}")))?;
            let iter = table.iter().map_err(|e| Error::Storage(format!("failed to iterate links: {e}")))?;
            let mut count = 0;
            for row in iter {
                let (_, bytes) = row.map_err(|e| Error::Storage(format!("failed to read link row: {e}")))?;
                let link: PrincipleLink = deserialize(bytes.value())?;
                if link.source_id == principle_id || link.target_id == principle_id {
                    count += 1;
                }
            }
            Ok(count)
        })
        .await
    }
}

impl RedbStore {
    pub(crate) async fn list_all_principles(&self) -> Result<Vec<Principle>> {
        run_blocking(&self.db, |db| {
            let read_txn = db.begin_read().map_err(|e| Error::Storage(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(PRINCIPLES_TABLE)
                .map_err(|e| Error::Storage(format!("failed to open principles table: {e}")))?;
            let iter = table.iter().map_err(|e| Error::Storage(format!("failed to iterate principles: {e}")))?;
            let mut out = Vec::new();
            for row in iter {
                let (_, bytes) = row.map_err(|e| Error::Storage(format!("failed to read principle row: {e}")))?;
                out.push(deserialize(bytes.value())?);
            }
            Ok(out)
        })
        .await
    }
}
