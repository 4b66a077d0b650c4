//! `cerno principles --limit N`: list live principles.

use serde::Serialize;

use crate::app::App;
use crate::output::{Output, OutputFormat};

#[derive(Serialize)]
struct PrincipleRow {
    id: String,
    category: String,
    status: String,
    rank: f32,
    confidence: f32,
    content: String,
}

#[derive(Serialize)]
struct PrinciplesReport(Vec<PrincipleRow>);

impl Output for PrinciplesReport {
    fn write_human(&self) -> String {
        if self.0.is_empty() {
            return "no live principles".to_string();
        }
        self.0
            .iter()
            .map(|row| {
                format!(
                    "{}  [{}/{}]  rank={:.3}  conf={:.2}  {}",
                    row.id, row.category, row.status, row.rank, row.confidence, row.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub async fn run(app: &App, limit: usize, format: OutputFormat) -> anyhow::Result<()> {
    let mut principles = app.principle_store.list_live(limit).await?;
    principles.sort_by(|a, b| b.rank.total_cmp(&a.rank));
    let rows = principles
        .into_iter()
        .map(|principle| PrincipleRow {
            id: principle.id.to_string(),
            category: format!("{:?}", principle.category),
            status: format!("{:?}", principle.status),
            rank: principle.rank,
            confidence: principle.confidence,
            content: principle.content,
        })
        .collect();
    PrinciplesReport(rows).write(format);
    Ok(())
}
