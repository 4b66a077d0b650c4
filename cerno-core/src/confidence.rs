//! Recomputes `confidence` for every active insight in four fixed adjuster
//! steps, clamped to `[0, 1]` at the end.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::store::InsightStore;
use crate::types::Insight;

const STALE_DAYS: i64 = 90;
const STALE_MULTIPLIER: f32 = 0.9;
const CONTRADICTION_MULTIPLIER: f32 = 0.8;
const MULTI_PROJECT_STEP: f32 = 0.05;
const OBSERVATION_FLOOR_LOG_BASE: f32 = 50.0;
const OBSERVATION_FLOOR_CAP: f32 = 0.6;

/// Recompute one insight's confidence from its current fields.
///
/// `distinct_projects` is the count of distinct `source_project` values
/// across the insight's sources; `has_unresolved_contradiction` reflects
/// whether any contradiction referencing this insight is unresolved.
#[must_use]
pub fn adjust_confidence(
    base_confidence: f32,
    distinct_projects: usize,
    last_seen_at: chrono::DateTime<Utc>,
    has_unresolved_contradiction: bool,
    observation_count: i64,
    now: chrono::DateTime<Utc>,
) -> f32 {
    let mut confidence = base_confidence;

    // 1. Multi-project boost.
    let p = distinct_projects.max(1) as f32;
    confidence = (confidence + MULTI_PROJECT_STEP * (p - 1.0)).min(1.0);

    // 2. Stale decay.
    let days_since_seen = (now - last_seen_at).num_days();
    if days_since_seen > STALE_DAYS {
        confidence *= STALE_MULTIPLIER;
    }

    // 3. Contradiction penalty.
    if has_unresolved_contradiction {
        confidence *= CONTRADICTION_MULTIPLIER;
    }

    // 4. Observation floor.
    let floor = (((1.0 + observation_count as f32).ln()) / OBSERVATION_FLOOR_LOG_BASE.ln())
        .min(OBSERVATION_FLOOR_CAP);
    confidence = confidence.max(floor);

    confidence.clamp(0.0, 1.0)
}

/// Recompute confidence for every active insight in the store, capped at
/// [`crate::constants::CONFIDENCE_SCAN_CAP`].
pub async fn run_confidence_adjustment(store: &Arc<dyn InsightStore>) -> Result<usize> {
    let insights = store
        .list_active(crate::constants::CONFIDENCE_SCAN_CAP)
        .await?;
    let mut updated = 0usize;
    let now = Utc::now();

    for insight in insights {
        let distinct_projects = distinct_project_count(store, &insight).await?;
        let has_contradiction = store.has_unresolved_contradiction(insight.id).await?;
        let new_confidence = adjust_confidence(
            insight.confidence,
            distinct_projects,
            insight.last_seen_at,
            has_contradiction,
            insight.observation_count,
            now,
        );
        if (new_confidence - insight.confidence).abs() > f32::EPSILON {
            let mut updated_insight = insight.clone();
            updated_insight.confidence = new_confidence;
            store.update(&updated_insight).await?;
            updated += 1;
        }
    }
    Ok(updated)
}

async fn distinct_project_count(store: &Arc<dyn InsightStore>, insight: &Insight) -> Result<usize> {
    let sources = store.sources_for(insight.id).await?;
    let projects: HashSet<&str> = sources.iter().map(|s| s.source_project.as_str()).collect();
    Ok(projects.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn multi_project_boost_is_capped_at_one() {
        let now = Utc::now();
        let confidence = adjust_confidence(0.99, 10, now, false, 1, now);
        assert!(confidence <= 1.0);
    }

    #[test]
    fn stale_insight_decays() {
        let now = Utc::now();
        let last_seen = now - Duration::days(120);
        let confidence = adjust_confidence(0.8, 1, last_seen, false, 1, now);
        assert!((confidence - 0.72).abs() < 1e-4);
    }

    #[test]
    fn unresolved_contradiction_penalizes() {
        let now = Utc::now();
        let confidence = adjust_confidence(0.8, 1, now, true, 1, now);
        assert!((confidence - 0.64).abs() < 1e-4);
    }

    #[test]
    fn observation_floor_lifts_low_confidence() {
        let now = Utc::now();
        let confidence = adjust_confidence(0.0, 1, now, false, 49, now);
        assert!(confidence > 0.0);
        assert!(confidence <= OBSERVATION_FLOOR_CAP);
    }

    #[test]
    fn result_is_always_clamped() {
        let now = Utc::now();
        let confidence = adjust_confidence(1.5, 1, now, false, 1, now);
        assert!(confidence <= 1.0);
    }
}
