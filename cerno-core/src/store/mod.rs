//! Storage trait boundary. The persistence engine itself is an external
//! collaborator; the pipeline only ever talks to these traits.

mod insight_store;
mod metadata_store;
mod principle_store;
mod vector_index;

pub use insight_store::{ClusterBuild, InsightStore, PromotionQuery};
pub use metadata_store::MetadataStore;
pub use principle_store::PrincipleStore;
pub use vector_index::{ScoredHit, VectorIndex};
