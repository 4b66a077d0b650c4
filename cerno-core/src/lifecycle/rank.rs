//! The composite ranking function.

use crate::config::PipelineConfig;
use crate::types::Principle;

/// `rank = w1·confidence + w2·freq_norm + w3·recency + w4·source_quality +
/// w5·link_norm`, with `freq_norm = min(log(1+frequency)/log(150), 1)` and
/// `link_norm = min(link_count/20, 1)`. Weights are configurable and need
/// not sum to one.
#[must_use]
pub fn compute_rank(principle: &Principle, link_count: usize, config: &PipelineConfig) -> f32 {
    let freq_norm = (((1.0 + principle.frequency as f64).ln())
        / crate::constants::RANK_FREQUENCY_NORM_BASE.ln())
    .min(1.0);
    let link_norm = (link_count as f64 / crate::constants::RANK_LINK_NORM_CAP).min(1.0);

    let rank = config.rank_weight_confidence * f64::from(principle.confidence)
        + config.rank_weight_frequency * freq_norm
        + config.rank_weight_recency * f64::from(principle.recency_score)
        + config.rank_weight_source_quality * f64::from(principle.source_quality)
        + config.rank_weight_links * link_norm;

    rank.clamp(0.0, 1.0) as f32
}
