//! Cerno's bidirectional knowledge-memory pipeline: fragments parsed from
//! context files accumulate into insights, insights reconcile and promote
//! into long-lived principles, and principles resolve back into target
//! files as retrieved, ranked, conflict-aware sections.
//!
//! The crate is organized around the data's lifecycle, one module per
//! pipeline stage, all speaking through the storage traits in [`store`] so a
//! persistence backend is an external collaborator rather than a compile-time
//! dependency.

pub mod accumulator;
pub mod classifier;
pub mod clusterer;
pub mod confidence;
pub mod config;
pub mod constants;
pub mod embeddings;
pub mod error;
pub mod events;
pub mod formatter;
pub mod lifecycle;
pub mod linker;
pub mod negation;
pub mod organiser;
pub mod parser;
pub mod promoter;
pub mod reconciler;
pub mod resolver;
pub mod retriever;
pub mod store;
pub mod types;

pub use error::{Error, Result};
