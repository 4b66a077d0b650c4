//! Table definitions for the embedded database.

use redb::TableDefinition;

/// Insights, keyed by insight ID (UUID string), postcard-encoded.
pub(crate) const INSIGHTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("insights");

/// Insight sources, keyed by fragment ID (already content-addressed, so the
/// key itself enforces the "idempotent on fragment_id" contract).
pub(crate) const INSIGHT_SOURCES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("insight_sources");

/// Contradictions, keyed by `"{low_id}:{high_id}"` (unordered-pair
/// normalized), enforcing the unique-pair contract via key overwrite.
pub(crate) const CONTRADICTIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("contradictions");

/// Clusters, keyed by cluster ID (UUID string).
pub(crate) const CLUSTERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("clusters");

/// Cluster membership rows, keyed by `"{cluster_id}:{insight_id}"`.
pub(crate) const CLUSTER_MEMBERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cluster_members");

/// Principles, keyed by principle ID (UUID string).
pub(crate) const PRINCIPLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("principles");

/// Derivations, keyed by `"{principle_id}:{insight_id}"`, enforcing the
/// unique-pair contract via key overwrite.
pub(crate) const DERIVATIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("derivations");

/// Principle links, keyed by `"{source_id}:{target_id}:{link_type}"`,
/// enforcing the unique-triple contract via key overwrite.
pub(crate) const LINKS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("links");

/// Watched projects, keyed by their filesystem path.
pub(crate) const WATCHED_PROJECTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("watched_projects");

/// Accumulation run audit rows, keyed by run ID (UUID string).
pub(crate) const ACCUMULATION_RUNS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("accumulation_runs");

/// Resolution run audit rows, keyed by run ID (UUID string).
pub(crate) const RESOLUTION_RUNS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("resolution_runs");
