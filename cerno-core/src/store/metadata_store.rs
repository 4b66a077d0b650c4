//! Watched-project tracking and the accumulation/resolution audit log.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AccumulationRun, ResolutionRun, WatchedProject};

/// Persistence surface for [`WatchedProject`], [`AccumulationRun`], and
/// [`ResolutionRun`] rows.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Look up a watched project by path.
    async fn watched_project(&self, path: &str) -> Result<Option<WatchedProject>>;

    /// Insert or replace a watched project row, keyed on its unique path.
    async fn upsert_watched_project(&self, project: WatchedProject) -> Result<()>;

    /// List every registered watched project, active or not.
    async fn list_watched_projects(&self) -> Result<Vec<WatchedProject>>;

    /// Persist a new accumulation run row.
    async fn insert_accumulation_run(&self, run: &AccumulationRun) -> Result<()>;

    /// Persist an in-place update to an accumulation run (status,
    /// completion, counters).
    async fn update_accumulation_run(&self, run: &AccumulationRun) -> Result<()>;

    /// Persist a new resolution run row.
    async fn insert_resolution_run(&self, run: &ResolutionRun) -> Result<()>;

    /// Persist an in-place update to a resolution run.
    async fn update_resolution_run(&self, run: &ResolutionRun) -> Result<()>;
}
