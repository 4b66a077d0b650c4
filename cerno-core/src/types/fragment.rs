//! The transient unit the parser produces: one H2-delimited section of a
//! context file, never persisted.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::Path;

/// One parsed section of a context file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// `SHA-256(source_path ∥ content)`, lowercase hex.
    pub id: String,
    /// Raw section text, trimmed.
    pub content: String,
    /// Path of the file this fragment was extracted from.
    pub source_path: String,
    /// Basename of the containing directory.
    pub source_project: String,
    /// Heading text, absent for the file's leading preamble.
    pub section_heading: Option<String>,
    /// Inclusive one-based `(start, end)` line range in the source file.
    pub line_range: (usize, usize),
    /// SHA-256 of the whole file at extraction time.
    pub file_hash: String,
    /// Extraction timestamp.
    pub extracted_at: DateTime<Utc>,
}

impl Fragment {
    /// Compute the content-addressed fragment identity.
    #[must_use]
    pub fn compute_id(source_path: &str, content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source_path.as_bytes());
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Derive `source_project` from the basename of the containing
    /// directory, falling back to the empty string for paths without a
    /// parent.
    #[must_use]
    pub fn project_for_path(path: &Path) -> String {
        path.parent()
            .and_then(Path::file_name)
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string()
    }
}

/// Minimal local hex encoder, avoiding an extra crate dependency for a single
/// call site — the same approach `sha2`-adjacent teacher code uses when hex
/// output is the only consumer.
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        use std::fmt::Write;
        let mut out = String::with_capacity(bytes.as_ref().len() * 2);
        for byte in bytes.as_ref() {
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}
