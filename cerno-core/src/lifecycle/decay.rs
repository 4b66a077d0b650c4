//! Frequency-weighted recency decay.

use chrono::{DateTime, Utc};

use crate::config::PipelineConfig;
use crate::types::Principle;

/// `effective_half_life = half_life_days / (1 + ln(max(frequency, 1)))`;
/// `recency_score = 2^(-days_since_update / effective_half_life)`, clamped
/// to `[0, 1]`.
#[must_use]
pub fn compute_recency_score(principle: &Principle, now: DateTime<Utc>, config: &PipelineConfig) -> f32 {
    let days_since_update = (now - principle.updated_at).num_days().max(0) as f64;
    let frequency_factor = 1.0 + (principle.frequency.max(1) as f64).ln();
    let effective_half_life = (config.half_life_days / frequency_factor).max(f64::EPSILON);
    let score = 2.0_f64.powf(-days_since_update / effective_half_life);
    score.clamp(0.0, 1.0) as f32
}
