//! Recency decay, rank recomputation, and the prune/decay status
//! transitions, run as three sequential sub-steps per pass.

pub mod decay;
pub mod rank;

use std::sync::Arc;

use chrono::Utc;

use crate::config::PipelineConfig;
use crate::constants::{LIFECYCLE_CHANGE_EPSILON, LIFECYCLE_SCAN_CAP};
use crate::error::Result;
use crate::store::PrincipleStore;
use crate::types::PrincipleStatus;

/// Summary of one lifecycle pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct LifecycleStats {
    /// Principles whose `recency_score` changed by more than the epsilon.
    pub decayed: usize,
    /// Principles whose `rank` changed by more than the epsilon.
    pub reranked: usize,
    /// Principles transitioned to `pruned`.
    pub pruned: usize,
    /// Principles transitioned to `decaying`.
    pub decaying: usize,
}

/// Drives the three lifecycle sub-steps.
pub struct Lifecycle {
    principle_store: Arc<dyn PrincipleStore>,
    config: PipelineConfig,
}

impl Lifecycle {
    /// Build a lifecycle driver over the given principle store.
    #[must_use]
    pub fn new(principle_store: Arc<dyn PrincipleStore>, config: PipelineConfig) -> Self {
        Self {
            principle_store,
            config,
        }
    }

    /// Run decay, then rank, then the prune-then-decay status transition.
    pub async fn run(&self) -> Result<LifecycleStats> {
        let now = Utc::now();
        let mut stats = LifecycleStats::default();

        let principles = self.principle_store.list_live(LIFECYCLE_SCAN_CAP).await?;

        // Decay.
        for principle in &principles {
            let new_score = decay::compute_recency_score(principle, now, &self.config);
            if (f64::from(new_score) - f64::from(principle.recency_score)).abs() > LIFECYCLE_CHANGE_EPSILON {
                let mut updated = principle.clone();
                updated.recency_score = new_score;
                self.principle_store.update(&updated).await?;
                stats.decayed += 1;
            }
        }

        // Re-fetch so rank sees any just-persisted recency changes.
        let principles = self.principle_store.list_live(LIFECYCLE_SCAN_CAP).await?;

        // Rank.
        for principle in &principles {
            let link_count = self.principle_store.link_count(principle.id).await?;
            let new_rank = rank::compute_rank(principle, link_count, &self.config);
            if (f64::from(new_rank) - f64::from(principle.rank)).abs() > LIFECYCLE_CHANGE_EPSILON {
                let mut updated = principle.clone();
                updated.rank = new_rank;
                self.principle_store.update(&updated).await?;
                stats.reranked += 1;
            }
        }

        // Prune, then decay (order matters: stricter gate first).
        let principles = self.principle_store.list_live(LIFECYCLE_SCAN_CAP).await?;
        for principle in &principles {
            let age_days = (now - principle.updated_at).num_days();
            let mut updated = principle.clone();
            let mut changed = false;

            if age_days > self.config.prune_age_days && f64::from(principle.rank) < self.config.prune_threshold {
                updated.status = PrincipleStatus::Pruned;
                changed = true;
                stats.pruned += 1;
            } else if principle.status == PrincipleStatus::Active
                && age_days > self.config.decay_age_days
                && f64::from(principle.rank) < self.config.decay_threshold
            {
                updated.status = PrincipleStatus::Decaying;
                changed = true;
                stats.decaying += 1;
            }

            if changed {
                self.principle_store.update(&updated).await?;
            }
        }

        Ok(stats)
    }
}
