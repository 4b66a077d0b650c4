//! End-to-end coverage of the upward flow: parsing a file into fragments,
//! exact and semantic deduplication, and the clustering pass that surfaces
//! contradictions across near-duplicate insights.

mod support;

use std::io::Write;
use std::sync::Arc;

use cerno_core::clusterer::Clusterer;
use cerno_core::config::PipelineConfig;
use cerno_core::embeddings::EmbeddingPool;
use cerno_core::parser::MarkdownParser;
use cerno_core::store::InsightStore;

use support::{FixedEmbeddingProvider, MemoryStore};

fn write_context_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{content}").unwrap();
    path
}

#[tokio::test]
async fn repeated_fragment_is_deduplicated_exactly() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FixedEmbeddingProvider::new(4));
    let pool = Arc::new(EmbeddingPool::with_capacity(provider, 10));
    let config = PipelineConfig::default();

    let accumulator = cerno_core::accumulator::Accumulator::new(
        store.clone(),
        store.clone(),
        store.clone(),
        pool,
        config,
    );
    let parser = MarkdownParser;

    let dir = tempfile::tempdir().unwrap();
    let path = write_context_file(&dir, "CONTEXT.md", "## Rules\n\nAlways run tests before merging.\n");

    let first = accumulator.accumulate_path(&path, &parser, "demo").await.unwrap().unwrap();
    assert_eq!(first.fragments_found, 1);
    assert_eq!(first.insights_created, 1);
    assert_eq!(first.insights_updated, 0);

    // Append an identical fragment under a new heading; same content hash.
    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(file, "\n## Reminder\n\nAlways run tests before merging.\n").unwrap();
    drop(file);

    let second = accumulator.accumulate_path(&path, &parser, "demo").await.unwrap().unwrap();
    assert_eq!(second.insights_created, 0);
    assert_eq!(second.insights_updated, 1);

    let active = store.list_active(10).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].observation_count, 2);
}

#[tokio::test]
async fn near_duplicate_wording_is_deduplicated_semantically() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FixedEmbeddingProvider::new(4));
    let a = "## Rules\n\nAlways format code with rustfmt before committing.";
    let b = "## Style\n\nAlways run rustfmt on code prior to committing.";
    provider.set(a, vec![1.0, 0.0, 0.0, 0.0]);
    provider.set(b, vec![0.99, 0.01, 0.0, 0.0]);
    let pool = Arc::new(EmbeddingPool::with_capacity(provider, 10));

    let mut config = PipelineConfig::default();
    config.semantic_threshold = 0.9;

    let accumulator = cerno_core::accumulator::Accumulator::new(
        store.clone(),
        store.clone(),
        store.clone(),
        pool,
        config,
    );
    let parser = MarkdownParser;

    let dir = tempfile::tempdir().unwrap();
    let path_a = write_context_file(&dir, "A.md", &format!("{a}\n"));
    accumulator.accumulate_path(&path_a, &parser, "demo").await.unwrap();

    let path_b = write_context_file(&dir, "B.md", &format!("{b}\n"));
    let run_b = accumulator.accumulate_path(&path_b, &parser, "demo").await.unwrap().unwrap();

    assert_eq!(run_b.insights_created, 0);
    assert_eq!(run_b.insights_updated, 1);

    let active = store.list_active(10).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].observation_count, 2);
}

#[tokio::test]
async fn opposing_statements_in_the_contradiction_window_are_flagged() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FixedEmbeddingProvider::new(4));
    let a = "## Rules\n\nAlways use global mutable state for configuration.";
    let b = "## Warnings\n\nNever use global mutable state for configuration.";
    // 0.7 cosine puts these inside the default [0.5, 0.85] contradiction window.
    provider.set(a, vec![1.0, 0.0, 0.0, 0.0]);
    provider.set(b, vec![0.7, 0.714, 0.0, 0.0]);
    let pool = Arc::new(EmbeddingPool::with_capacity(provider, 10));

    let mut config = PipelineConfig::default();
    config.semantic_threshold = 0.99;

    let accumulator = cerno_core::accumulator::Accumulator::new(
        store.clone(),
        store.clone(),
        store.clone(),
        pool,
        config,
    );
    let parser = MarkdownParser;

    let dir = tempfile::tempdir().unwrap();
    let path_a = write_context_file(&dir, "A.md", &format!("{a}\n"));
    let run_a = accumulator.accumulate_path(&path_a, &parser, "demo").await.unwrap().unwrap();
    assert_eq!(run_a.insights_created, 1);

    let path_b = write_context_file(&dir, "B.md", &format!("{b}\n"));
    let run_b = accumulator.accumulate_path(&path_b, &parser, "demo").await.unwrap().unwrap();
    assert_eq!(run_b.insights_created, 1, "dissimilar enough to avoid semantic dedup");

    let active = store.list_active(10).await.unwrap();
    assert_eq!(active.len(), 2);
    let flagged = store.has_unresolved_contradiction(active[0].id).await.unwrap()
        || store.has_unresolved_contradiction(active[1].id).await.unwrap();
    assert!(flagged, "negated pair in the contradiction window should be recorded");
}

#[tokio::test]
async fn clusterer_groups_connected_insights_and_rebuilds_on_each_run() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FixedEmbeddingProvider::new(2));
    let a = "## A\n\nPrefer small functions.";
    let b = "## B\n\nPrefer small, focused functions.";
    let c = "## C\n\nUse SQL transactions for multi-row writes.";
    provider.set(a, vec![1.0, 0.0]);
    provider.set(b, vec![0.98, 0.0]);
    provider.set(c, vec![0.0, 1.0]);
    let pool = Arc::new(EmbeddingPool::with_capacity(provider, 10));

    let mut config = PipelineConfig::default();
    config.semantic_threshold = 1.1; // force step C to never fire, so all three survive as distinct insights
    config.cluster_threshold = 0.9;

    let accumulator = cerno_core::accumulator::Accumulator::new(
        store.clone(),
        store.clone(),
        store.clone(),
        pool.clone(),
        config.clone(),
    );
    let parser = MarkdownParser;
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in [("A.md", a), ("B.md", b), ("C.md", c)] {
        let path = write_context_file(&dir, name, &format!("{content}\n"));
        accumulator.accumulate_path(&path, &parser, "demo").await.unwrap();
    }
    assert_eq!(store.list_active(10).await.unwrap().len(), 3);

    let clusterer = Clusterer::new(store.clone(), store.clone(), config);
    let stats = clusterer.run().await.unwrap();
    assert_eq!(stats.clusters_created, 2, "A/B connect, C stands alone");

    let clusters = store.list_clusters().await.unwrap();
    assert_eq!(clusters.len(), 2);
}
