//! The provenance edge from an insight to the principle it was promoted
//! into.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A `(principle, insight)` provenance edge. Unique per pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Derivation {
    /// Store-assigned identity.
    pub id: Uuid,
    /// The principle this derivation contributes to.
    pub principle_id: Uuid,
    /// The insight that contributed.
    pub insight_id: Uuid,
    /// Contribution weight in `[0, 1]`.
    pub contribution_weight: f32,
}

impl Derivation {
    /// A fresh promotion derivation: full contribution weight.
    #[must_use]
    pub fn promoted(principle_id: Uuid, insight_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            principle_id,
            insight_id,
            contribution_weight: 1.0,
        }
    }
}
