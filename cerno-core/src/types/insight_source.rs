//! Provenance row linking a persisted insight back to the fragment(s) that
//! contributed to it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `(insight_id, fragment_id)` provenance row. Unique on `fragment_id` — a
/// fragment is linked to at most one insight at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSource {
    /// Store-assigned identity.
    pub id: Uuid,
    /// The insight this fragment contributed to.
    pub insight_id: Uuid,
    /// Content-addressed fragment identity; unique across all sources.
    pub fragment_id: String,
    /// Path of the file the fragment was extracted from.
    pub source_path: String,
    /// Basename of the containing directory.
    pub source_project: String,
    /// Heading text, absent for the file's leading preamble.
    pub section_heading: Option<String>,
    /// Inclusive start line in the source file.
    pub line_range_start: usize,
    /// Inclusive end line in the source file.
    pub line_range_end: usize,
    /// SHA-256 of the whole file at extraction time.
    pub file_hash: String,
}

impl InsightSource {
    /// Build a source row from a fragment and the insight it resolved into.
    #[must_use]
    pub fn from_fragment(insight_id: Uuid, fragment: &crate::types::Fragment) -> Self {
        Self {
            id: Uuid::new_v4(),
            insight_id,
            fragment_id: fragment.id.clone(),
            source_path: fragment.source_path.clone(),
            source_project: fragment.source_project.clone(),
            section_heading: fragment.section_heading.clone(),
            line_range_start: fragment.line_range.0,
            line_range_end: fragment.line_range.1,
            file_hash: fragment.file_hash.clone(),
        }
    }
}
