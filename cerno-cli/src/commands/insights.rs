//! `cerno insights --limit N`: list active insights.

use serde::Serialize;


use crate::app::App;
use crate::output::{Output, OutputFormat};

#[derive(Serialize)]
struct InsightRow {
    id: String,
    category: String,
    confidence: f32,
    observation_count: i64,
    content: String,
}

#[derive(Serialize)]
struct InsightsReport(Vec<InsightRow>);

impl Output for InsightsReport {
    fn write_human(&self) -> String {
        if self.0.is_empty() {
            return "no active insights".to_string();
        }
        self.0
            .iter()
            .map(|row| {
                format!(
                    "{}  [{}]  conf={:.2}  obs={}  {}",
                    row.id, row.category, row.confidence, row.observation_count, row.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub async fn run(app: &App, limit: usize, format: OutputFormat) -> anyhow::Result<()> {
    let insights = app.insight_store.list_active(limit).await?;
    let rows = insights
        .into_iter()
        .map(|insight| InsightRow {
            id: insight.id.to_string(),
            category: format!("{:?}", insight.category),
            confidence: insight.confidence,
            observation_count: insight.observation_count,
            content: insight.content,
        })
        .collect();
    InsightsReport(rows).write(format);
    Ok(())
}
