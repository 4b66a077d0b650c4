//! Embedding provider boundary, vector math, and the batching/caching pool.

pub mod pool;
pub mod provider;
pub mod similarity;

pub use pool::EmbeddingPool;
pub use provider::{EmbeddingProvider, FailingEmbeddingProvider, MockEmbeddingProvider};
