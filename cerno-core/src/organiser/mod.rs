//! Orchestrates promotion, linking, and lifecycle maintenance as one
//! mutually-exclusive pass, triggered by `ReconciliationComplete` or invoked
//! directly by the CLI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, instrument};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::events::{Event, EventBus};
use crate::lifecycle::{Lifecycle, LifecycleStats};
use crate::linker::{Linker, LinkerStats};
use crate::promoter::{PromotionOutcome, Promoter};
use crate::store::InsightStore;

/// Summary of one organisation pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrganisationStats {
    /// Promotion candidates evaluated.
    pub candidates_evaluated: usize,
    /// New principles created.
    pub principles_created: usize,
    /// Candidates that matched an existing principle (exact or semantic).
    pub principles_deduped: usize,
    /// Linking pass output.
    pub linking: LinkerStats,
    /// Lifecycle pass output.
    pub lifecycle: LifecycleStats,
}

/// Drives the Promotion → Linking → Lifecycle pipeline as a single unit.
/// Mutually exclusive with itself: a request that arrives while a run is in
/// progress is dropped with a debug log, mirroring the Reconciler.
pub struct Organiser {
    insight_store: Arc<dyn InsightStore>,
    promoter: Promoter,
    linker: Linker,
    lifecycle: Lifecycle,
    config: PipelineConfig,
    running: AtomicBool,
}

impl Organiser {
    /// Build an organiser over the given insight store and the already-built
    /// promotion, linking, and lifecycle components.
    #[must_use]
    pub fn new(
        insight_store: Arc<dyn InsightStore>,
        promoter: Promoter,
        linker: Linker,
        lifecycle: Lifecycle,
        config: PipelineConfig,
    ) -> Self {
        Self {
            insight_store,
            promoter,
            linker,
            lifecycle,
            config,
            running: AtomicBool::new(false),
        }
    }

    /// Run one organisation pass, or return `Ok(None)` if one is already in
    /// progress.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<Option<OrganisationStats>> {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("organisation rejected: a run is already in progress");
            return Ok(None);
        }

        let result = self.run_inner().await;
        self.running.store(false, Ordering::SeqCst);
        result.map(Some)
    }

    async fn run_inner(&self) -> Result<OrganisationStats> {
        let mut stats = OrganisationStats::default();

        let candidates = self
            .insight_store
            .promotion_candidates(crate::store::PromotionQuery {
                min_confidence: self.config.min_confidence,
                min_observations: self.config.min_observations,
                min_age_days: self.config.min_age_days,
                limit: crate::constants::PROMOTION_CANDIDATE_CAP,
            })
            .await?;
        stats.candidates_evaluated = candidates.len();

        for candidate in &candidates {
            match self.promoter.promote(candidate).await? {
                PromotionOutcome::Created => stats.principles_created += 1,
                PromotionOutcome::SkippedExact | PromotionOutcome::SkippedSemantic => {
                    stats.principles_deduped += 1;
                }
            }
        }

        stats.linking = self.linker.run().await?;
        stats.lifecycle = self.lifecycle.run().await?;

        Ok(stats)
    }

    /// Run in the background, triggering a pass on every
    /// [`Event::ReconciliationComplete`] until the bus's sender is dropped.
    pub fn spawn_listener(self: Arc<Self>, events: &EventBus) -> tokio::task::JoinHandle<()> {
        let mut receiver = events.subscribe();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(Event::ReconciliationComplete) => {
                        if let Err(err) = self.run().await {
                            error!(error = %err, "organisation pass failed");
                        }
                    }
                    Ok(_) => {}
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "organiser event listener lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
