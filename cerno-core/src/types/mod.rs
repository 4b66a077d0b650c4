//! The persisted and transient entities of the knowledge pipeline.

mod cluster;
mod contradiction;
mod derivation;
mod fragment;
mod insight;
mod insight_source;
mod link;
mod principle;
mod run;
mod watched_project;

pub use cluster::Cluster;
pub use contradiction::{Contradiction, ContradictionType, ResolutionStatus};
pub use derivation::Derivation;
pub use fragment::Fragment;
pub use insight::{Insight, InsightCategory, InsightStatus};
pub use insight_source::InsightSource;
pub use link::{LinkType, PrincipleLink};
pub use principle::{Principle, PrincipleCategory, PrincipleStatus};
pub use run::{AccumulationRun, ResolutionRun, RunStatus};
pub use watched_project::WatchedProject;
