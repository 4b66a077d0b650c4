//! Wires the already-built pipeline components over one shared store handle.
//!
//! Every command operates against the same [`App`]: one redb-backed store
//! coerced into each of the four storage traits, one embedding pool, one
//! parser registry, and one event bus shared by the Reconciler and
//! Organiser.

use std::path::PathBuf;
use std::sync::Arc;

use cerno_core::accumulator::Accumulator;
use cerno_core::clusterer::Clusterer;
use cerno_core::config::CernoConfig;
use cerno_core::embeddings::pool::EmbeddingPool;
use cerno_core::embeddings::provider::{EmbeddingProvider, MockEmbeddingProvider};
use cerno_core::error::Result;
use cerno_core::events::EventBus;
use cerno_core::formatter::{Formatter, MarkdownFormatter};
use cerno_core::lifecycle::Lifecycle;
use cerno_core::linker::Linker;
use cerno_core::organiser::Organiser;
use cerno_core::parser::{MarkdownParser, ParserRegistry};
use cerno_core::promoter::Promoter;
use cerno_core::reconciler::Reconciler;
use cerno_core::resolver::Resolver;
use cerno_core::retriever::Retriever;
use cerno_core::store::{InsightStore, MetadataStore, PrincipleStore, VectorIndex};

use cerno_storage_redb::RedbStore;

/// Default embedding dimension when neither config nor `CERNO_EMBEDDING_DIMENSION`
/// specifies one.
const DEFAULT_EMBEDDING_DIMENSION: usize = 384;

/// Default broadcast capacity for the event bus.
const EVENT_BUS_CAPACITY: usize = 64;

/// Default database file, relative to the current directory, when the
/// config doesn't name one.
const DEFAULT_DATABASE_FILE: &str = "cerno.redb";

/// Every collaborator a command needs, built once from configuration.
pub struct App {
    pub config: CernoConfig,
    pub insight_store: Arc<dyn InsightStore>,
    pub principle_store: Arc<dyn PrincipleStore>,
    pub metadata_store: Arc<dyn MetadataStore>,
    pub vector_index: Arc<dyn VectorIndex>,
    pub embedding_pool: Arc<EmbeddingPool>,
    pub parsers: ParserRegistry,
    pub events: Arc<EventBus>,
}

impl App {
    /// Open the store and build every pipeline collaborator.
    pub async fn build(config: CernoConfig) -> Result<Self> {
        let database_path = config
            .database_url
            .clone()
            .map_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE), PathBuf::from);
        let store = Arc::new(RedbStore::open(&database_path).await?);

        let dimension = config.embedding_dimension.unwrap_or(DEFAULT_EMBEDDING_DIMENSION);
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(dimension));
        let embedding_pool = Arc::new(EmbeddingPool::new(provider));

        let mut parsers = ParserRegistry::new();
        parsers.register("*.md", Arc::new(MarkdownParser));

        let events = Arc::new(EventBus::new(EVENT_BUS_CAPACITY));

        Ok(Self {
            config,
            insight_store: store.clone(),
            principle_store: store.clone(),
            metadata_store: store.clone(),
            vector_index: store,
            embedding_pool,
            parsers,
            events,
        })
    }

    #[must_use]
    pub fn accumulator(&self) -> Accumulator {
        Accumulator::new(
            self.insight_store.clone(),
            self.metadata_store.clone(),
            self.vector_index.clone(),
            self.embedding_pool.clone(),
            self.config.pipeline.clone(),
        )
    }

    #[must_use]
    pub fn clusterer(&self) -> Clusterer {
        Clusterer::new(self.insight_store.clone(), self.vector_index.clone(), self.config.pipeline.clone())
    }

    #[must_use]
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(
            self.insight_store.clone(),
            self.clusterer(),
            self.config.pipeline.clone(),
            self.events.clone(),
        )
    }

    #[must_use]
    pub fn organiser(&self) -> Organiser {
        let promoter = Promoter::new(self.principle_store.clone(), self.vector_index.clone(), self.config.pipeline.clone());
        let linker = Linker::new(self.principle_store.clone(), self.vector_index.clone(), self.config.pipeline.clone());
        let lifecycle = Lifecycle::new(self.principle_store.clone(), self.config.pipeline.clone());
        Organiser::new(self.insight_store.clone(), promoter, linker, lifecycle, self.config.pipeline.clone())
    }

    #[must_use]
    pub fn retriever(&self) -> Retriever {
        Retriever::new(
            self.principle_store.clone(),
            self.vector_index.clone(),
            self.embedding_pool.clone(),
            self.config.pipeline.clone(),
        )
    }

    #[must_use]
    pub fn resolver(&self) -> Resolver {
        let formatter: Arc<dyn Formatter> = Arc::new(MarkdownFormatter::default());
        Resolver::new(self.retriever(), formatter, self.metadata_store.clone(), self.embedding_pool.clone(), self.config.pipeline.clone())
    }
}
