//! Re-clusters active insights, deduplicates and cross-checks them for
//! contradictions, rebalances confidence, and surfaces promotion
//! candidates. Mutually exclusive with itself: a request that arrives while
//! a run is in progress is dropped with a debug log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::clusterer::{ClusterRunStats, Clusterer};
use crate::config::PipelineConfig;
use crate::confidence::run_confidence_adjustment;
use crate::error::Result;
use crate::events::{Event, EventBus};
use crate::store::{InsightStore, PromotionQuery};
use crate::types::Insight;

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationStats {
    /// Clustering/dedup/contradiction stats.
    pub clustering: ClusterRunStats,
    /// Insights whose confidence changed.
    pub confidence_adjusted: usize,
    /// Promotion candidates found (read-only; not yet promoted).
    pub promotion_candidates: usize,
}

/// Drives one reconciliation pass.
pub struct Reconciler {
    insight_store: Arc<dyn InsightStore>,
    clusterer: Clusterer,
    config: PipelineConfig,
    events: Arc<EventBus>,
    running: AtomicBool,
}

impl Reconciler {
    /// Build a reconciler over the given insight store, vector index, and
    /// event bus.
    #[must_use]
    pub fn new(
        insight_store: Arc<dyn InsightStore>,
        clusterer: Clusterer,
        config: PipelineConfig,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            insight_store,
            clusterer,
            config,
            events,
            running: AtomicBool::new(false),
        }
    }

    /// Run one reconciliation pass, or return `Ok(None)` if one is already
    /// in progress.
    pub async fn run(&self) -> Result<Option<ReconciliationStats>> {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("reconciliation rejected: a run is already in progress");
            return Ok(None);
        }

        let result = self.run_inner().await;
        self.running.store(false, Ordering::SeqCst);
        result.map(Some)
    }

    async fn run_inner(&self) -> Result<ReconciliationStats> {
        let clustering = self.clusterer.run().await?;
        let confidence_adjusted = run_confidence_adjustment(&self.insight_store).await?;
        let candidates = self.promotion_candidates().await?;

        self.events.publish(Event::ReconciliationComplete);

        Ok(ReconciliationStats {
            clustering,
            confidence_adjusted,
            promotion_candidates: candidates.len(),
        })
    }

    /// The read-only promotion-candidate query (§4.4).
    pub async fn promotion_candidates(&self) -> Result<Vec<Insight>> {
        let query = PromotionQuery {
            min_confidence: self.config.min_confidence,
            min_observations: self.config.min_observations,
            min_age_days: self.config.min_age_days,
            limit: crate::constants::PROMOTION_CANDIDATE_CAP,
        };
        let candidates = self.insight_store.promotion_candidates(query).await?;
        if candidates.len() == crate::constants::PROMOTION_CANDIDATE_CAP {
            tracing::warn!(
                cap = crate::constants::PROMOTION_CANDIDATE_CAP,
                "promotion candidate cap reached"
            );
        }
        Ok(candidates)
    }
}
