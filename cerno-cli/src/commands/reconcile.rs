//! `cerno reconcile`: run one reconciliation pass.

use serde::Serialize;

use crate::app::App;
use crate::output::{Output, OutputFormat};

#[derive(Serialize)]
struct ReconcileReport {
    ran: bool,
    clusters_created: usize,
    contradictions_found: usize,
    confidence_adjusted: usize,
    promotion_candidates: usize,
}

impl Output for ReconcileReport {
    fn write_human(&self) -> String {
        if !self.ran {
            return "reconciliation already in progress, skipped".to_string();
        }
        format!(
            "clusters built: {}\ncontradictions found: {}\nconfidence adjusted: {}\npromotion candidates: {}",
            self.clusters_created, self.contradictions_found, self.confidence_adjusted, self.promotion_candidates
        )
    }
}

pub async fn run(app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let reconciler = app.reconciler();
    let report = match reconciler.run().await? {
        Some(stats) => ReconcileReport {
            ran: true,
            clusters_created: stats.clustering.clusters_created,
            contradictions_found: stats.clustering.contradictions_found,
            confidence_adjusted: stats.confidence_adjusted,
            promotion_candidates: stats.promotion_candidates,
        },
        None => ReconcileReport {
            ran: false,
            clusters_created: 0,
            contradictions_found: 0,
            confidence_adjusted: 0,
            promotion_candidates: 0,
        },
    };
    report.write(format);
    Ok(())
}
