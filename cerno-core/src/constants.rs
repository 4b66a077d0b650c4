//! Default thresholds and caps. All are overridable through [`crate::config::CernoConfig`];
//! the `const`s here are the production defaults referenced throughout the
//! component docs.

/// Maximum context-file size accepted by the parser, in bytes.
pub const MAX_FILE_SIZE_BYTES: u64 = 1024 * 1024;

/// Cosine-similarity threshold above which two insights are treated as the
/// same during accumulation's semantic dedup step.
pub const DEFAULT_SEMANTIC_THRESHOLD: f32 = 0.92;

/// Lower bound of the contradiction probe similarity window.
pub const DEFAULT_CONTRADICTION_LOW: f32 = 0.5;

/// Upper bound of the contradiction probe similarity window.
pub const DEFAULT_CONTRADICTION_HIGH: f32 = 0.85;

/// Cap on contradiction-probe candidates considered per new insight.
pub const CONTRADICTION_PROBE_CAP: usize = 20;

/// Per-path cooldown after a completed accumulation run, in seconds.
pub const ACCUMULATOR_COOLDOWN_SECS: u64 = 30;

/// Cosine-similarity threshold for intra-cluster deduplication.
pub const DEFAULT_CLUSTER_THRESHOLD: f32 = 0.88;

/// Cap on active insights loaded for a clustering pass.
pub const CLUSTER_LOAD_CAP: usize = 5_000;

/// Cap on neighbours fetched per insight during graph build.
pub const CLUSTER_NEIGHBOUR_CAP: usize = 100;

/// Minimum confidence for a promotion candidate (production default).
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.7;

/// Minimum confidence for a promotion candidate (dev/test default).
pub const DEV_MIN_CONFIDENCE: f32 = 0.3;

/// Minimum observation count for a promotion candidate.
pub const DEFAULT_MIN_OBSERVATIONS: i64 = 3;

/// Minimum age, in days, for a promotion candidate.
pub const DEFAULT_MIN_AGE_DAYS: i64 = 7;

/// Cap on promotion-candidate rows returned per reconciliation.
pub const PROMOTION_CANDIDATE_CAP: usize = 10_000;

/// Cap on rows scanned per confidence-adjustment pass.
pub const CONFIDENCE_SCAN_CAP: usize = 10_000;

/// Cap on rows scanned per decay/rank lifecycle pass.
pub const LIFECYCLE_SCAN_CAP: usize = 10_000;

/// Cosine-similarity threshold for semantic dedup during promotion.
pub const DEFAULT_PROMOTION_SEMANTIC_THRESHOLD: f32 = 0.92;

/// Cosine-similarity lower bound for link candidate discovery.
pub const LINKER_CANDIDATE_MIN_SIMILARITY: f32 = 0.5;

/// Cap on link candidates considered per principle.
pub const LINKER_CANDIDATE_CAP: usize = 20;

/// Similarity above which two principles `reinforce` each other.
pub const LINK_REINFORCES_THRESHOLD: f32 = 0.85;

/// Lower bound of the `related` similarity band.
pub const LINK_RELATED_LOW: f32 = 0.70;

/// Lower bound of the `contradicts` similarity band.
pub const LINK_CONTRADICTS_LOW: f32 = 0.50;

/// Default half-life, in days, for principle recency decay.
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 90.0;

/// Minimum change in a decay/rank value required before it is persisted.
pub const LIFECYCLE_CHANGE_EPSILON: f64 = 1e-3;

/// Default rank weight for confidence.
pub const DEFAULT_RANK_WEIGHT_CONFIDENCE: f64 = 0.35;
/// Default rank weight for normalized frequency.
pub const DEFAULT_RANK_WEIGHT_FREQUENCY: f64 = 0.25;
/// Default rank weight for recency.
pub const DEFAULT_RANK_WEIGHT_RECENCY: f64 = 0.20;
/// Default rank weight for source quality.
pub const DEFAULT_RANK_WEIGHT_SOURCE_QUALITY: f64 = 0.15;
/// Default rank weight for normalized link count.
pub const DEFAULT_RANK_WEIGHT_LINKS: f64 = 0.05;

/// Divisor used to normalize `frequency` in the rank formula: `log(150)`.
pub const RANK_FREQUENCY_NORM_BASE: f64 = 150.0;

/// Divisor used to normalize `link_count` in the rank formula.
pub const RANK_LINK_NORM_CAP: f64 = 20.0;

/// Rank floor below which a principle becomes `pruned` (from `active` or `decaying`).
pub const DEFAULT_PRUNE_THRESHOLD: f64 = 0.10;

/// Age, in days, required before a principle qualifies for pruning.
pub const DEFAULT_PRUNE_AGE_DAYS: i64 = 180;

/// Rank floor below which an `active` principle becomes `decaying`.
pub const DEFAULT_DECAY_THRESHOLD: f64 = 0.15;

/// Age, in days, required before a principle qualifies for decay.
pub const DEFAULT_DECAY_AGE_DAYS: i64 = 90;

/// Cap on nearest-neighbour candidates scored during hybrid retrieval.
pub const RETRIEVAL_NEIGHBOUR_CAP: usize = 100;

/// Default minimum hybrid score for a retrieved principle.
pub const DEFAULT_MIN_HYBRID_SCORE: f32 = 0.3;

/// Default cap on principles returned from one retrieval.
pub const DEFAULT_MAX_PRINCIPLES: usize = 20;

/// Weight of cosine similarity in the hybrid score.
pub const HYBRID_WEIGHT_SIMILARITY: f32 = 0.50;

/// Weight of rank in the hybrid score.
pub const HYBRID_WEIGHT_RANK: f32 = 0.30;

/// Weight of domain overlap in the hybrid score.
pub const HYBRID_WEIGHT_DOMAIN: f32 = 0.20;

/// Weight of rank in the rank-only fallback score.
pub const RANK_ONLY_WEIGHT_RANK: f32 = 0.7;

/// Weight of domain score in the rank-only fallback score.
pub const RANK_ONLY_WEIGHT_DOMAIN: f32 = 0.3;

/// Similarity above which a section renders a principle already-represented.
pub const DEFAULT_ALREADY_REPRESENTED_THRESHOLD: f32 = 0.85;

/// Lower bound of the already-represented conflict band.
pub const CONFLICT_BAND_LOW: f32 = 0.5;

/// Upper bound of the already-represented conflict band.
pub const CONFLICT_BAND_HIGH: f32 = 0.7;

/// Number of top file domains kept from paragraph classification.
pub const FILE_DOMAIN_TOP_N: usize = 3;

/// Character truncation applied to file content before embedding.
pub const RETRIEVAL_EMBED_TRUNCATE_CHARS: usize = 8_000;

/// Maximum tags kept on a classified fragment.
pub const MAX_TAGS: usize = 5;

/// Embedding batch flush window.
pub const EMBED_BATCH_FLUSH_MS: u64 = 500;

/// Embedding batch size cap.
pub const EMBED_BATCH_CAP: usize = 20;

/// Embedding cache size cap (distinct content hashes).
pub const EMBED_CACHE_CAP: usize = 10_000;

/// Task-supervisor fanout cap.
pub const TASK_SUPERVISOR_FANOUT_CAP: usize = 20;

/// Resolver client-visible deadline, in seconds.
pub const RESOLVER_DEADLINE_SECS: u64 = 60;

/// Heading marking the resolver's injected section.
pub const RESOLVED_SECTION_HEADING: &str = "## Resolved Knowledge from Cerno";
