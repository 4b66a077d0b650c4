//! End-to-end coverage of resolution: injecting retrieved principles into a
//! target file under the resolved-knowledge heading without disturbing the
//! rest of the file, and replacing a stale section on a second pass.

mod support;

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use cerno_core::config::PipelineConfig;
use cerno_core::constants::RESOLVED_SECTION_HEADING;
use cerno_core::embeddings::EmbeddingPool;
use cerno_core::formatter::MarkdownFormatter;
use cerno_core::promoter::Promoter;
use cerno_core::resolver::Resolver;
use cerno_core::retriever::Retriever;
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
        None,
        now,
    );
    insight.confidence = 0.95;
    insight.observation_count = 8;
    insight
}

async fn build_resolver(
    store: Arc<MemoryStore>,
    provider: Arc<FixedEmbeddingProvider>,
) -> Resolver {
    let config = PipelineConfig::default();
    let pool = Arc::new(EmbeddingPool::with_capacity(provider, 10));
    let retriever = Retriever::new(store.clone(), store.clone(), pool.clone(), config.clone());
    Resolver::new(
        retriever,
        Arc::new(MarkdownFormatter::default()),
        store,
        pool,
        config,
    )
}

#[tokio::test]
async fn resolve_appends_a_section_without_disturbing_existing_content() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FixedEmbeddingProvider::new(2));
    let embedding = vec![1.0, 0.0];

    let content = "## Notes\n\nThis project uses a monorepo layout.\n";
    provider.set("Run the full test suite before every release.", embedding.clone());
    provider.set(content, vec![0.7, 0.8]);
    // The resolver re-embeds per H2 section (not per paragraph), so the
    // registered key is the whole trimmed section, not just its body text.
    provider.set(content.trim_end(), vec![0.7, 0.8]);

    let promoter = Promoter::new(store.clone(), store.clone(), PipelineConfig::default());
    let insight = qualifying_insight("Run the full test suite before every release.", embedding);
    promoter.promote(&insight).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("CONTEXT.md");
    std::fs::File::create(&path).unwrap().write_all(content.as_bytes()).unwrap();

    let resolver = build_resolver(store.clone(), provider).await;
    let outcome = resolver.resolve(&path, None, false).await.unwrap();

    assert!(outcome.written);
    assert!(outcome.rendered_content.contains("This project uses a monorepo layout."));
    assert!(outcome.rendered_content.contains(RESOLVED_SECTION_HEADING));
    assert!(outcome.rendered_content.contains("Run the full test suite"));

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, outcome.rendered_content);
}

#[tokio::test]
async fn dry_run_renders_without_writing_the_file() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FixedEmbeddingProvider::new(2));
    let content = "## Notes\n\nNothing relevant here.\n";
    provider.set(content, vec![0.1, 0.1]);
    provider.set(content.trim_end(), vec![0.1, 0.1]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("CONTEXT.md");
    std::fs::File::create(&path).unwrap().write_all(content.as_bytes()).unwrap();

    let resolver = build_resolver(store, provider).await;
    let outcome = resolver.resolve(&path, None, true).await.unwrap();

    assert!(!outcome.written);
    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, content, "dry run must leave the file untouched");
}

#[tokio::test]
async fn a_second_resolve_replaces_the_stale_resolved_section_only() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FixedEmbeddingProvider::new(2));
    let embedding = vec![1.0, 0.0];
    provider.set("Document every public function.", embedding.clone());

    let promoter = Promoter::new(store.clone(), store.clone(), PipelineConfig::default());
    let insight = qualifying_insight("Document every public function.", embedding);
    promoter.promote(&insight).await.unwrap();

    let existing = format!(
        "## Notes\n\nBefore section.\n\n{RESOLVED_SECTION_HEADING}\n- a stale principle\n\n## Other\n\nAfter section.\n"
    );
    provider.set(&existing, vec![0.2, 0.3]);
    // One registered embedding per H2 chunk the resolver actually re-embeds.
    provider.set("## Notes\n\nBefore section.", vec![0.2, 0.3]);
    provider.set(&format!("{RESOLVED_SECTION_HEADING}\n- a stale principle"), vec![0.2, 0.3]);
    provider.set("## Other\n\nAfter section.", vec![0.2, 0.3]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("CONTEXT.md");
    std::fs::File::create(&path).unwrap().write_all(existing.as_bytes()).unwrap();

    let resolver = build_resolver(store, provider).await;
    let outcome = resolver.resolve(&path, Some("claude"), false).await.unwrap();

    assert!(outcome.rendered_content.contains("Before section."));
    assert!(outcome.rendered_content.contains("After section."));
    assert!(outcome.rendered_content.contains("## Other"));
    assert!(!outcome.rendered_content.contains("a stale principle"));
    assert!(outcome.rendered_content.contains("Document every public function."));
    assert_eq!(outcome.run.agent_type, "claude");
}

#[tokio::test]
async fn resolving_into_a_symlink_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(FixedEmbeddingProvider::new(2));

    let dir = tempfile::tempdir().unwrap();
    let real = dir.path().join("REAL.md");
    std::fs::write(&real, "content").unwrap();
    let link = dir.path().join("LINK.md");
    #[cfg(unix)]
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let resolver = build_resolver(store, provider).await;
    let err = resolver.resolve(&link, None, true).await.unwrap_err();
    assert!(matches!(err, cerno_core::error::Error::InputValidation(_)));
}
