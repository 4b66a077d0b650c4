//! Runtime configuration: the numeric thresholds every component reads, and
//! the TOML-plus-environment-overlay loader used by the CLI.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Deployment environment, controlling which promotion-confidence default
/// applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// `min_confidence` defaults to 0.7.
    Production,
    /// `min_confidence` defaults to 0.3.
    Development,
}

impl Default for Environment {
    fn default() -> Self {
        Self::Production
    }
}

/// Every overridable numeric threshold used by the pipeline's algorithmic
/// components. All fields have production defaults matching the component
/// docs; callers override only the fields a deployment actually needs to
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Accumulator step C: semantic-dedup cosine threshold.
    pub semantic_threshold: f32,
    /// Accumulator step E / Clusterer cross-cluster scan: lower bound of the
    /// contradiction probe window.
    pub contradiction_low: f32,
    /// Upper bound of the contradiction probe window.
    pub contradiction_high: f32,
    /// Clusterer: graph edge and intra-cluster dedup threshold.
    pub cluster_threshold: f32,
    /// Reconciler: minimum confidence for a promotion candidate.
    pub min_confidence: f32,
    /// Reconciler: minimum observation count for a promotion candidate.
    pub min_observations: i64,
    /// Reconciler: minimum age, in days, for a promotion candidate.
    pub min_age_days: i64,
    /// Promoter: semantic-dedup cosine threshold against live principles.
    pub promotion_semantic_threshold: f32,
    /// Lifecycle: recency half-life, in days, before frequency weighting.
    pub half_life_days: f64,
    /// Lifecycle: rank formula confidence weight.
    pub rank_weight_confidence: f64,
    /// Lifecycle: rank formula normalized-frequency weight.
    pub rank_weight_frequency: f64,
    /// Lifecycle: rank formula recency weight.
    pub rank_weight_recency: f64,
    /// Lifecycle: rank formula source-quality weight.
    pub rank_weight_source_quality: f64,
    /// Lifecycle: rank formula normalized-link-count weight.
    pub rank_weight_links: f64,
    /// Lifecycle: rank floor below which a live principle is pruned.
    pub prune_threshold: f64,
    /// Lifecycle: minimum age, in days, to qualify for pruning.
    pub prune_age_days: i64,
    /// Lifecycle: rank floor below which an active principle decays.
    pub decay_threshold: f64,
    /// Lifecycle: minimum age, in days, to qualify for decay.
    pub decay_age_days: i64,
    /// Retriever: minimum hybrid score to retain a candidate.
    pub min_hybrid_score: f32,
    /// Retriever: maximum principles returned per retrieval.
    pub max_principles: usize,
    /// Retriever: cosine threshold above which a section renders a
    /// principle already-represented.
    pub already_represented_threshold: f32,
    /// Accumulator: per-path cooldown after a completed run, in seconds.
    pub accumulator_cooldown_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            semantic_threshold: DEFAULT_SEMANTIC_THRESHOLD,
            contradiction_low: DEFAULT_CONTRADICTION_LOW,
            contradiction_high: DEFAULT_CONTRADICTION_HIGH,
            cluster_threshold: DEFAULT_CLUSTER_THRESHOLD,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_observations: DEFAULT_MIN_OBSERVATIONS,
            min_age_days: DEFAULT_MIN_AGE_DAYS,
            promotion_semantic_threshold: DEFAULT_PROMOTION_SEMANTIC_THRESHOLD,
            half_life_days: DEFAULT_HALF_LIFE_DAYS,
            rank_weight_confidence: DEFAULT_RANK_WEIGHT_CONFIDENCE,
            rank_weight_frequency: DEFAULT_RANK_WEIGHT_FREQUENCY,
            rank_weight_recency: DEFAULT_RANK_WEIGHT_RECENCY,
            rank_weight_source_quality: DEFAULT_RANK_WEIGHT_SOURCE_QUALITY,
            rank_weight_links: DEFAULT_RANK_WEIGHT_LINKS,
            prune_threshold: DEFAULT_PRUNE_THRESHOLD,
            prune_age_days: DEFAULT_PRUNE_AGE_DAYS,
            decay_threshold: DEFAULT_DECAY_THRESHOLD,
            decay_age_days: DEFAULT_DECAY_AGE_DAYS,
            min_hybrid_score: DEFAULT_MIN_HYBRID_SCORE,
            max_principles: DEFAULT_MAX_PRINCIPLES,
            already_represented_threshold: DEFAULT_ALREADY_REPRESENTED_THRESHOLD,
            accumulator_cooldown_secs: ACCUMULATOR_COOLDOWN_SECS,
        }
    }
}

impl PipelineConfig {
    /// Apply the environment's `min_confidence` default when the caller
    /// hasn't already overridden it via TOML or environment variables.
    #[must_use]
    pub fn for_environment(mut self, environment: Environment) -> Self {
        if (self.min_confidence - DEFAULT_MIN_CONFIDENCE).abs() < f32::EPSILON
            && environment == Environment::Development
        {
            self.min_confidence = DEV_MIN_CONFIDENCE;
        }
        self
    }
}

/// Top-level configuration: deployment environment, external credentials,
/// and the pipeline thresholds. Deserialized from TOML, then overlaid with
/// `CERNO_*` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CernoConfig {
    /// Deployment environment.
    pub environment: Environment,
    /// Connection string for the persistence backend.
    pub database_url: Option<String>,
    /// Embedding provider API credentials.
    pub embedding_api_key: Option<String>,
    /// Per-environment embedding dimension override.
    pub embedding_dimension: Option<usize>,
    /// Algorithmic thresholds.
    pub pipeline: PipelineConfig,
}

impl CernoConfig {
    /// Parse configuration from a TOML string, then overlay the
    /// `CERNO_DATABASE_URL`, `CERNO_EMBEDDING_API_KEY`, and
    /// `CERNO_EMBEDDING_DIMENSION` environment variables when present.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::Serialization`]-shaped failures are not
    /// applicable here; a malformed document yields
    /// [`crate::error::Error::InputValidation`].
    pub fn from_toml_str(toml_str: &str) -> crate::error::Result<Self> {
        let mut config: Self = toml::from_str(toml_str)
            .map_err(|e| crate::error::Error::InputValidation(format!("invalid config: {e}")))?;
        config.apply_env_overlay();
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults overlaid
    /// with environment variables if the file does not exist.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::Io`] for read failures other than
    /// "not found", and [`crate::error::Error::InputValidation`] for
    /// malformed TOML.
    pub fn load_from_path(path: &std::path::Path) -> crate::error::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let mut config = Self::default();
                config.apply_env_overlay();
                Ok(config)
            }
            Err(e) => Err(crate::error::Error::Io(e)),
        }
    }

    fn apply_env_overlay(&mut self) {
        if let Ok(url) = std::env::var("CERNO_DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Ok(key) = std::env::var("CERNO_EMBEDDING_API_KEY") {
            self.embedding_api_key = Some(key);
        }
        if let Ok(dim) = std::env::var("CERNO_EMBEDDING_DIMENSION") {
            if let Ok(parsed) = dim.parse() {
                self.embedding_dimension = Some(parsed);
            }
        }
        self.pipeline = std::mem::take(&mut self.pipeline).for_environment(self.environment);
    }
}
