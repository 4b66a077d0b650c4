//! Edge cases and degradation paths not covered by the core scenario tests:
//! idempotent re-scans, empty files, embedding-provider failure fallback,
//! watched-project bookkeeping, and resolving into a missing target file.

mod support;

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use cerno_core::accumulator::Accumulator;
use cerno_core::config::PipelineConfig;
use cerno_core::constants::RESOLVED_SECTION_HEADING;
use cerno_core::embeddings::pool::EmbeddingPool;
use cerno_core::embeddings::provider::{FailingEmbeddingProvider, MockEmbeddingProvider};
use cerno_core::formatter::MarkdownFormatter;
use cerno_core::parser::MarkdownParser;
use cerno_core::resolver::Resolver;
use cerno_core::retriever::Retriever;
use cerno_core::store::{MetadataStore, PrincipleStore};
use cerno_core::types::{Principle, PrincipleCategory, PrincipleStatus, WatchedProject};

use support::MemoryStore;

#[tokio::test]
async fn rescanning_an_unchanged_file_does_not_duplicate_work() {
    let store = Arc::new(MemoryStore::new());
    let pool = Arc::new(EmbeddingPool::new(Arc::new(MockEmbeddingProvider::new(16))));
    let accumulator = Accumulator::new(store.clone(), store.clone(), store.clone(), pool, PipelineConfig::default());
    let parser = MarkdownParser;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("CONTEXT.md");
    std::fs::write(&path, "## Rules\n\nPrefer early returns.\n").unwrap();

    let first = accumulator.accumulate_path(&path, &parser, "demo").await.unwrap().unwrap();
    assert_eq!(first.insights_created, 1);

    // Same bytes on disk: the watched project's file hash should short-
    // circuit re-parsing entirely.
    let second = accumulator.accumulate_path(&path, &parser, "demo").await.unwrap().unwrap();
    assert_eq!(second.fragments_found, 0);
    assert_eq!(second.insights_created, 0);
    assert_eq!(second.insights_updated, 0);
}

#[tokio::test]
async fn empty_file_produces_a_completed_run_with_no_insights() {
    let store = Arc::new(MemoryStore::new());
    let pool = Arc::new(EmbeddingPool::new(Arc::new(MockEmbeddingProvider::new(16))));
    let accumulator = Accumulator::new(store.clone(), store.clone(), store.clone(), pool, PipelineConfig::default());
    let parser = MarkdownParser;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("EMPTY.md");
    std::fs::File::create(&path).unwrap();

    let run = accumulator.accumulate_path(&path, &parser, "demo").await.unwrap().unwrap();
    assert_eq!(run.fragments_found, 0);
    assert_eq!(run.insights_created, 0);
    assert!(run.errors.is_empty());
}

#[tokio::test]
async fn retrieval_falls_back_to_rank_only_when_embedding_fails() {
    let store = Arc::new(MemoryStore::new());
    let now = Utc::now();
    let principle = Principle {
        id: uuid::Uuid::new_v4(),
        content: "Keep modules under one responsibility.".into(),
        elaboration: None,
        content_hash: "h1".into(),
        embedding: None,
        category: PrincipleCategory::Principle,
        tags: Default::default(),
        domains: Default::default(),
        confidence: 0.9,
        frequency: 10,
        recency_score: 1.0,
        source_quality: 0.6,
        rank: 0.9,
        status: PrincipleStatus::Active,
        created_at: now,
        updated_at: now,
    };
    PrincipleStore::insert(store.as_ref(), principle).await.unwrap();

    let pool = Arc::new(EmbeddingPool::new(Arc::new(FailingEmbeddingProvider)));
    let config = PipelineConfig::default();
    let retriever = Retriever::new(store.clone(), store.clone(), pool, config);

    let outcome = retriever.retrieve("whatever content this file has").await.unwrap();
    assert!(outcome.used_rank_only_fallback);
    assert_eq!(outcome.kept.len(), 1);
    assert!(outcome.kept[0].similarity.is_none());
}

#[tokio::test]
async fn watched_projects_are_listed_after_registration() {
    let store = MemoryStore::new();
    assert!(store.list_watched_projects().await.unwrap().is_empty());

    store
        .upsert_watched_project(WatchedProject::new("demo".into(), "/tmp/demo".into()))
        .await
        .unwrap();
    let listed = store.list_watched_projects().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "demo");
    assert!(listed[0].active);
}

#[tokio::test]
async fn oversized_file_is_rejected_and_recorded_on_the_run() {
    let store = Arc::new(MemoryStore::new());
    let pool = Arc::new(EmbeddingPool::new(Arc::new(MockEmbeddingProvider::new(16))));
    let accumulator = Accumulator::new(store.clone(), store.clone(), store.clone(), pool, PipelineConfig::default());
    let parser = MarkdownParser;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("HUGE.md");
    let mut file = std::fs::File::create(&path).unwrap();
    let oversized = "x".repeat(cerno_core::constants::MAX_FILE_SIZE_BYTES as usize + 1);
    file.write_all(oversized.as_bytes()).unwrap();
    drop(file);

    let run = accumulator.accumulate_path(&path, &parser, "demo").await.unwrap().unwrap();
    assert_eq!(run.status, cerno_core::types::RunStatus::Failed);
    assert!(!run.errors.is_empty());
}

#[tokio::test]
async fn resolving_a_missing_file_creates_it_with_only_the_resolved_section() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(support::FixedEmbeddingProvider::new(2));
    provider.set("", vec![0.0, 0.0]);

    let config = PipelineConfig::default();
    let pool = Arc::new(EmbeddingPool::with_capacity(provider, 10));
    let retriever = Retriever::new(store.clone(), store.clone(), pool.clone(), config.clone());
    let resolver = Resolver::new(retriever, Arc::new(MarkdownFormatter::default()), store, pool, config);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("MISSING.md");
    assert!(!path.exists());

    let outcome = resolver.resolve(&path, None, false).await.unwrap();

    assert!(outcome.written);
    assert_eq!(outcome.rendered_content, format!("{RESOLVED_SECTION_HEADING}\n"));

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, outcome.rendered_content);
}
