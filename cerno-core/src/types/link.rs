//! Typed edges between principles, modeled after the same typed-relationship
//! pattern used elsewhere in the corpus for inter-entity edges: an enum with
//! a string round-trip and an explicit directionality flag, rather than a
//! bare string column.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The six relationship types a pair of principles can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Symmetric: the two principles restate the same idea.
    Reinforces,
    /// Directional: `source` is the more general form of `target`.
    Generalizes,
    /// Directional: `source` is a more specific form of `target`.
    Specializes,
    /// Symmetric: the two principles conflict.
    Contradicts,
    /// Directional: `source` depends on `target`.
    DependsOn,
    /// Symmetric catch-all for related-but-unclassified pairs.
    Related,
}

impl LinkType {
    /// True for relationship types where `(source, target)` order carries
    /// meaning beyond storage normalization.
    #[must_use]
    pub fn is_directional(self) -> bool {
        matches!(self, Self::Generalizes | Self::Specializes | Self::DependsOn)
    }

    /// Stable string form used in logs and the CLI's inspection output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reinforces => "reinforces",
            Self::Generalizes => "generalizes",
            Self::Specializes => "specializes",
            Self::Contradicts => "contradicts",
            Self::DependsOn => "depends_on",
            Self::Related => "related",
        }
    }

    /// Parse the string form back into a [`LinkType`].
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "reinforces" => Some(Self::Reinforces),
            "generalizes" => Some(Self::Generalizes),
            "specializes" => Some(Self::Specializes),
            "contradicts" => Some(Self::Contradicts),
            "depends_on" => Some(Self::DependsOn),
            "related" => Some(Self::Related),
            _ => None,
        }
    }
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed edge between two principles. Stored with `source_id < target_id`;
/// unique on `(source_id, target_id, link_type)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipleLink {
    /// Store-assigned identity.
    pub id: Uuid,
    /// Smaller of the two principle IDs (storage-normalized, not necessarily
    /// the semantic "from" side for directional types).
    pub source_id: Uuid,
    /// Larger of the two principle IDs.
    pub target_id: Uuid,
    /// Relationship classification.
    pub link_type: LinkType,
    /// Strength in `[0, 1]`, the pairwise cosine similarity at detection
    /// time.
    pub strength: f32,
}

impl PrincipleLink {
    /// Build a link with IDs normalized to `source_id < target_id`.
    #[must_use]
    pub fn new(a: Uuid, b: Uuid, link_type: LinkType, strength: f32) -> Self {
        let (source_id, target_id) = if a < b { (a, b) } else { (b, a) };
        Self {
            id: Uuid::new_v4(),
            source_id,
            target_id,
            link_type,
            strength,
        }
    }
}
