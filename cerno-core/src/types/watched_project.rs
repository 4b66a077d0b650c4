//! A project directory under accumulation, tracked so unchanged files short
//! circuit the parse step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One watched project/path pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedProject {
    /// Human-readable name.
    pub name: String,
    /// Unique path watched for this project.
    pub path: String,
    /// Timestamp of the last successful accumulation.
    pub last_scanned_at: Option<DateTime<Utc>>,
    /// `SHA-256` of the file content as of the last scan.
    pub file_hash: Option<String>,
    /// Whether this project is currently active (watched/scanned).
    pub active: bool,
}

impl WatchedProject {
    /// Register a new, never-scanned project.
    #[must_use]
    pub fn new(name: String, path: String) -> Self {
        Self {
            name,
            path,
            last_scanned_at: None,
            file_hash: None,
            active: true,
        }
    }

    /// True if `current_hash` differs from the hash recorded at last scan —
    /// the Accumulator's "unchanged fast path" gate.
    #[must_use]
    pub fn has_changed(&self, current_hash: &str) -> bool {
        self.file_hash.as_deref() != Some(current_hash)
    }

    /// Record a completed scan.
    pub fn mark_scanned(&mut self, file_hash: String, now: DateTime<Utc>) {
        self.file_hash = Some(file_hash);
        self.last_scanned_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_has_changed_against_any_hash() {
        let project = WatchedProject::new("demo".into(), "/p".into());
        assert!(project.has_changed("abc123"));
    }

    #[test]
    fn unchanged_hash_is_not_a_change() {
        let mut project = WatchedProject::new("demo".into(), "/p".into());
        project.mark_scanned("abc123".into(), Utc::now());
        assert!(!project.has_changed("abc123"));
        assert!(project.has_changed("def456"));
    }
}
