//! End-to-end coverage of the downward flow: promoting a qualifying insight
//! into a principle, then retrieving it for a target file via hybrid
//! similarity-plus-rank scoring.

mod support;

use std::sync::Arc;

use chrono::Utc;
use cerno_core::config::PipelineConfig;
use cerno_core::embeddings::EmbeddingPool;
use cerno_core::promoter::{Promoter, PromotionOutcome};
use cerno_core::retriever::Retriever;
use cerno_core::store::PrincipleStore;
use cerno_core::types::{Insight, InsightCategory};

use support::{FixedEmbeddingProvider, MemoryStore};

fn qualifying_insight(content: &str, embedding: Vec<f32>) -> Insight {
    let now = Utc::now() - chrono::Duration::days(30);
    let mut insight = Insight::new_created(
        content.to_string(),
        format!("hash-{content}"),
        Some(embedding),
        InsightCategory::Convention,
        Default::default(),
        Some("rust".to_string()),
        now,
    );
    insight.confidence = 0.9;
    insight.observation_count = 5;
    insight.inserted_at = now;
    insight
}

#[tokio::test]
async fn promoted_insight_is_retrieved_for_a_relevant_file() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FixedEmbeddingProvider::new(3));
    let insight_embedding = vec![1.0, 0.0, 0.0];
    // Similar enough to score well, but below the already-represented
    // threshold so the retriever doesn't drop it as already covered.
    let file_embedding = vec![0.6, 0.8, 0.0];
    provider.set("Always write integration tests for public APIs.", insight_embedding.clone());

    let file_content = "We ship a library crate in cargo.\n\nPublic API surface needs coverage.";
    provider.set(file_content, file_embedding);

    let config = PipelineConfig::default();
    let promoter = Promoter::new(store.clone(), store.clone(), config.clone());

    let insight = qualifying_insight("Always write integration tests for public APIs.", insight_embedding);
    let outcome = promoter.promote(&insight).await.unwrap();
    assert_eq!(outcome, PromotionOutcome::Created);

    let principles = store.list_live(10).await.unwrap();
    assert_eq!(principles.len(), 1);
    assert_eq!(principles[0].content, insight.content);
    assert_eq!(principles[0].domains.iter().next().map(String::as_str), Some("rust"));

    let pool = Arc::new(EmbeddingPool::with_capacity(provider, 10));
    let retriever = Retriever::new(store.clone(), store.clone(), pool, config);
    let outcome = retriever.retrieve(file_content).await.unwrap();

    assert!(!outcome.used_rank_only_fallback);
    assert_eq!(outcome.kept.len(), 1);
    assert_eq!(outcome.kept[0].principle.content, insight.content);
}

#[tokio::test]
async fn re_promoting_the_same_insight_only_adds_a_derivation() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FixedEmbeddingProvider::new(2));
    let embedding = vec![1.0, 0.0];
    provider.set("Keep functions under fifty lines.", embedding.clone());

    let config = PipelineConfig::default();
    let promoter = Promoter::new(store.clone(), store.clone(), config);

    let insight = qualifying_insight("Keep functions under fifty lines.", embedding);
    assert_eq!(promoter.promote(&insight).await.unwrap(), PromotionOutcome::Created);
    assert_eq!(promoter.promote(&insight).await.unwrap(), PromotionOutcome::SkippedExact);

    assert_eq!(store.list_live(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn unrelated_file_receives_no_principles() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FixedEmbeddingProvider::new(2));
    let insight_embedding = vec![1.0, 0.0];
    provider.set("Prefer composition over inheritance.", insight_embedding.clone());
    provider.set("unrelated deployment notes", vec![0.0, 1.0]);

    let config = PipelineConfig::default();
    let promoter = Promoter::new(store.clone(), store.clone(), config.clone());
    let insight = qualifying_insight("Prefer composition over inheritance.", insight_embedding);
    promoter.promote(&insight).await.unwrap();

    let pool = Arc::new(EmbeddingPool::with_capacity(provider, 10));
    let retriever = Retriever::new(store.clone(), store.clone(), pool, config);
    let outcome = retriever.retrieve("unrelated deployment notes").await.unwrap();
    assert!(outcome.kept.is_empty());
}
