//! `cerno status`: summarize watched projects, active insights, and live
//! principles.

use serde::Serialize;

use cerno_core::constants::{CLUSTER_LOAD_CAP, LIFECYCLE_SCAN_CAP};

use crate::app::App;
use crate::output::{Output, OutputFormat};

#[derive(Serialize)]
struct StatusReport {
    watched_projects: usize,
    active_insights: usize,
    live_principles: usize,
}

impl Output for StatusReport {
    fn write_human(&self) -> String {
        format!(
            "watched projects: {}\nactive insights: {}\nlive principles: {}",
            self.watched_projects, self.active_insights, self.live_principles
        )
    }
}

pub async fn run(app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let watched_projects = app.metadata_store.list_watched_projects().await?.len();
    let active_insights = app.insight_store.list_active(CLUSTER_LOAD_CAP).await?.len();
    let live_principles = app.principle_store.list_live(LIFECYCLE_SCAN_CAP).await?.len();

    StatusReport {
        watched_projects,
        active_insights,
        live_principles,
    }
    .write(format);
    Ok(())
}
