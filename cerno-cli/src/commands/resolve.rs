//! `cerno resolve <path> [--agent X --dry-run]`: inject retrieved knowledge
//! into a target file.

use std::path::Path;

use serde::Serialize;

use crate::app::App;
use crate::output::{Output, OutputFormat};

#[derive(Serialize)]
struct ResolveReport {
    target: String,
    principles_resolved: i64,
    conflicts_detected: i64,
    written: bool,
}

impl Output for ResolveReport {
    fn write_human(&self) -> String {
        format!(
            "{}: {} principles resolved, {} conflicts{}",
            self.target,
            self.principles_resolved,
            self.conflicts_detected,
            if self.written { "" } else { " (dry run, not written)" }
        )
    }
}

pub async fn run(app: &App, path: &Path, agent: Option<&str>, dry_run: bool, format: OutputFormat) -> anyhow::Result<()> {
    let resolver = app.resolver();
    let outcome = resolver.resolve(path, agent, dry_run).await?;

    if dry_run && format == OutputFormat::Human {
        println!("{}", outcome.rendered_content);
    }

    let report = ResolveReport {
        target: path.display().to_string(),
        principles_resolved: outcome.run.principles_resolved,
        conflicts_detected: outcome.run.conflicts_detected,
        written: outcome.written,
    };
    report.write(format);
    Ok(())
}
