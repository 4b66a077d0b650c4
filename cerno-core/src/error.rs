//! Error taxonomy for the knowledge pipeline.
//!
//! Each variant maps to one of the propagation policies a caller needs to
//! apply: surface immediately, fail the current run, degrade locally, treat
//! as success, log and count, or restart the affected actor. `is_recoverable`
//! answers the question "should the caller keep going" without the caller
//! needing to match on every variant.

use thiserror::Error;

/// Errors produced anywhere in the knowledge pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied input failed validation (missing path, oversize file,
    /// symlink target, unknown parser). Surfaced to the caller immediately.
    #[error("input validation failed: {0}")]
    InputValidation(String),

    /// A context file could not be parsed into fragments.
    #[error("parse error in {path}: {reason}")]
    Parse {
        /// Path of the file that failed to parse.
        path: String,
        /// Human-readable reason.
        reason: String,
    },

    /// An external provider (embedding, formatter, LLM classifier) failed.
    #[error("provider error: {0}")]
    Provider(String),

    /// A unique-key violation on an idempotent insert. Treated as success by
    /// callers; carried as a distinct variant only so it can be logged.
    #[error("conflict on insert: {0}")]
    Conflict(String),

    /// A single-row store operation failed; logged and counted, pipeline
    /// continues.
    #[error("row error: {0}")]
    RowError(String),

    /// Two vectors of differing dimension were compared. Dimension
    /// migration across embedding models is out of scope; this fails loudly
    /// instead of silently truncating or padding.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the index was built with.
        expected: usize,
        /// Dimension of the vector presented for comparison.
        actual: usize,
    },

    /// An unrecoverable condition (store connection exhausted, disk full).
    /// The supervisor should restart only the affected actor.
    #[error("fatal error: {0}")]
    Fatal(String),

    /// I/O passthrough.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization passthrough.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage backend passthrough (opaque to the core; backends wrap their
    /// own error types behind this variant).
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// True when the pipeline should keep making forward progress after this
    /// error rather than abort the whole run.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InputValidation(_) | Error::Fatal(_) | Error::DimensionMismatch { .. } => false,
            Error::Parse { .. }
            | Error::Provider(_)
            | Error::Conflict(_)
            | Error::RowError(_)
            | Error::Io(_)
            | Error::Serialization(_)
            | Error::Storage(_) => true,
        }
    }

    /// True for the idempotent-insert case: callers may treat this exactly
    /// like a successful no-op.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
