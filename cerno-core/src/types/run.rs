//! Audit rows recording each accumulation and resolution invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status shared by both run kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// In progress.
    Running,
    /// Finished without a fatal error.
    Completed,
    /// Aborted by a fatal or parse error.
    Failed,
}

/// Audit row for one Accumulator invocation over one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulationRun {
    /// Store-assigned identity.
    pub id: Uuid,
    /// Path that was accumulated.
    pub path: String,
    /// Current status.
    pub status: RunStatus,
    /// Start timestamp.
    pub started_at: DateTime<Utc>,
    /// Completion timestamp, absent while running.
    pub completed_at: Option<DateTime<Utc>>,
    /// Fragments produced by the parser.
    pub fragments_found: i64,
    /// New insights created.
    pub insights_created: i64,
    /// Existing insights updated.
    pub insights_updated: i64,
    /// Non-fatal errors recorded during the run.
    pub errors: Vec<String>,
}

impl AccumulationRun {
    /// Start a new run in the `running` state.
    #[must_use]
    pub fn start(path: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
            status: RunStatus::Running,
            started_at: now,
            completed_at: None,
            fragments_found: 0,
            insights_created: 0,
            insights_updated: 0,
            errors: Vec::new(),
        }
    }

    /// Mark the run completed with final counters.
    pub fn complete(
        &mut self,
        now: DateTime<Utc>,
        fragments_found: i64,
        insights_created: i64,
        insights_updated: i64,
    ) {
        self.status = RunStatus::Completed;
        self.completed_at = Some(now);
        self.fragments_found = fragments_found;
        self.insights_created = insights_created;
        self.insights_updated = insights_updated;
    }

    /// Mark the run failed, recording the reason.
    pub fn fail(&mut self, now: DateTime<Utc>, reason: String) {
        self.status = RunStatus::Failed;
        self.completed_at = Some(now);
        self.errors.push(reason);
    }
}

/// Audit row for one Resolver invocation over one target file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionRun {
    /// Store-assigned identity.
    pub id: Uuid,
    /// Target file path.
    pub target_path: String,
    /// Lowercased last segment of the formatter name used.
    pub agent_type: String,
    /// Current status.
    pub status: RunStatus,
    /// Start timestamp.
    pub started_at: DateTime<Utc>,
    /// Completion timestamp, absent while running.
    pub completed_at: Option<DateTime<Utc>>,
    /// Principles included in the resolved section.
    pub principles_resolved: i64,
    /// Conflicting principles flagged.
    pub conflicts_detected: i64,
}

impl ResolutionRun {
    /// Start a new run in the `running` state.
    #[must_use]
    pub fn start(target_path: String, agent_type: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_path,
            agent_type,
            status: RunStatus::Running,
            started_at: now,
            completed_at: None,
            principles_resolved: 0,
            conflicts_detected: 0,
        }
    }

    /// Mark the run completed with final counters.
    pub fn complete(&mut self, now: DateTime<Utc>, principles_resolved: i64, conflicts_detected: i64) {
        self.status = RunStatus::Completed;
        self.completed_at = Some(now);
        self.principles_resolved = principles_resolved;
        self.conflicts_detected = conflicts_detected;
    }
}
