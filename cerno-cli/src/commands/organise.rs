//! `cerno organise`: run one organisation pass (promote, link, lifecycle).

use serde::Serialize;

use crate::app::App;
use crate::output::{Output, OutputFormat};

#[derive(Serialize)]
struct OrganiseReport {
    ran: bool,
    candidates_evaluated: usize,
    principles_created: usize,
    principles_deduped: usize,
    links_written: usize,
    pruned: usize,
    decaying: usize,
}

impl Output for OrganiseReport {
    fn write_human(&self) -> String {
        if !self.ran {
            return "organisation already in progress, skipped".to_string();
        }
        format!(
            "candidates evaluated: {}\nprinciples created: {}\nprinciples deduped: {}\nlinks written: {}\npruned: {}\ndecaying: {}",
            self.candidates_evaluated, self.principles_created, self.principles_deduped, self.links_written, self.pruned, self.decaying
        )
    }
}

pub async fn run(app: &App, format: OutputFormat) -> anyhow::Result<()> {
    let organiser = app.organiser();
    let report = match organiser.run().await? {
        Some(stats) => OrganiseReport {
            ran: true,
            candidates_evaluated: stats.candidates_evaluated,
            principles_created: stats.principles_created,
            principles_deduped: stats.principles_deduped,
            links_written: stats.linking.links_written,
            pruned: stats.lifecycle.pruned,
            decaying: stats.lifecycle.decaying,
        },
        None => OrganiseReport {
            ran: false,
            candidates_evaluated: 0,
            principles_created: 0,
            principles_deduped: 0,
            links_written: 0,
            pruned: 0,
            decaying: 0,
        },
    };
    report.write(format);
    Ok(())
}
