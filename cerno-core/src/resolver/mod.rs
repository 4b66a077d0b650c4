//! Injects retrieved principles into a target file under a single marked
//! section, never touching content outside it.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::config::PipelineConfig;
use crate::constants::{CONFLICT_BAND_HIGH, CONFLICT_BAND_LOW, RESOLVED_SECTION_HEADING};
use crate::embeddings::pool::EmbeddingPool;
use crate::error::{Error, Result};
use crate::formatter::Formatter;
use crate::negation::is_negation_match;
use crate::retriever::{RetrievedPrinciple, Retriever};
use crate::store::MetadataStore;
use crate::types::ResolutionRun;

/// Outcome of one resolution call.
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    /// The completed audit row.
    pub run: ResolutionRun,
    /// The file content after injection (whether or not it was written).
    pub rendered_content: String,
    /// True if `rendered_content` was written to disk.
    pub written: bool,
}

/// Drives the retrieve → filter → render → inject pipeline for one target
/// file (§4.12).
pub struct Resolver {
    retriever: Retriever,
    formatter: Arc<dyn Formatter>,
    metadata_store: Arc<dyn MetadataStore>,
    embedding_pool: Arc<EmbeddingPool>,
    config: PipelineConfig,
}

impl Resolver {
    /// Build a resolver from its already-built collaborators.
    #[must_use]
    pub fn new(
        retriever: Retriever,
        formatter: Arc<dyn Formatter>,
        metadata_store: Arc<dyn MetadataStore>,
        embedding_pool: Arc<EmbeddingPool>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            retriever,
            formatter,
            metadata_store,
            embedding_pool,
            config,
        }
    }

    /// Resolve knowledge into `target_path`. Rejects symlinked targets.
    /// A missing target is treated as an empty file. When `dry_run` is true,
    /// the file is never written.
    pub async fn resolve(&self, target_path: &Path, agent: Option<&str>, dry_run: bool) -> Result<ResolveOutcome> {
        match std::fs::symlink_metadata(target_path) {
            Ok(metadata) => {
                if metadata.file_type().is_symlink() {
                    return Err(Error::InputValidation(format!(
                        "refusing to resolve into a symlink: {}",
                        target_path.display()
                    )));
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(Error::Io(err)),
        }

        let content = match tokio::fs::read_to_string(target_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(Error::Io(err)),
        };

        let agent_type = agent.unwrap_or("default").to_lowercase();
        let mut run = ResolutionRun::start(target_path.display().to_string(), agent_type, Utc::now());
        self.metadata_store.insert_resolution_run(&run).await?;

        let outcome = self.retriever.retrieve(&content).await?;
        let (kept, conflicts) = self.refine_by_sections(&content, outcome.kept).await;

        let body = self.formatter.format_sections(&kept, &conflicts);
        let rendered_content = inject_resolved_section(&content, &body);

        run.complete(Utc::now(), kept.len() as i64, conflicts.len() as i64);
        self.metadata_store.update_resolution_run(&run).await?;

        if !dry_run {
            tokio::fs::write(target_path, &rendered_content).await.map_err(Error::Io)?;
        }

        Ok(ResolveOutcome {
            run,
            rendered_content,
            written: !dry_run,
        })
    }

    /// Refine `candidates` against file-section embeddings (one per H2
    /// chunk): drop those already represented at or above
    /// `already_represented_threshold`, split off those whose best-matching
    /// section negates them within the conflict band, and keep the rest.
    /// Returns `(kept, conflicts)`. On embedding failure for any section,
    /// the whole refinement is skipped and `candidates` pass through as
    /// `kept` with no conflicts.
    async fn refine_by_sections(
        &self,
        content: &str,
        candidates: Vec<RetrievedPrinciple>,
    ) -> (Vec<RetrievedPrinciple>, Vec<RetrievedPrinciple>) {
        let sections = split_into_h2_sections(content);
        if sections.is_empty() {
            return (candidates, Vec::new());
        }

        let mut section_embeddings = Vec::with_capacity(sections.len());
        for section in &sections {
            match self.embedding_pool.get_or_embed(section).await {
                Ok(embedding) => section_embeddings.push(embedding),
                Err(err) => {
                    warn!(error = %err, "section embedding failed, skipping already-represented refinement");
                    return (candidates, Vec::new());
                }
            }
        }

        let mut kept = Vec::new();
        let mut conflicts = Vec::new();

        for mut entry in candidates {
            let Some(principle_embedding) = entry.principle.embedding.clone() else {
                kept.push(entry);
                continue;
            };

            let best = section_embeddings
                .iter()
                .zip(sections.iter())
                .filter_map(|(section_embedding, section_text)| {
                    crate::embeddings::similarity::cosine_similarity(section_embedding, &principle_embedding)
                        .ok()
                        .map(|sim| (sim, section_text))
                })
                .max_by(|a, b| a.0.total_cmp(&b.0));

            let Some((s, section_text)) = best else {
                kept.push(entry);
                continue;
            };

            if s >= self.config.already_represented_threshold {
                continue;
            }

            if (CONFLICT_BAND_LOW..=CONFLICT_BAND_HIGH).contains(&s)
                && is_negation_match(&section_text.to_lowercase(), &entry.principle.content.to_lowercase())
            {
                entry.similarity = Some(s);
                conflicts.push(entry);
            } else {
                kept.push(entry);
            }
        }

        (kept, conflicts)
    }
}

/// Split content into chunks starting at each `## ` heading; any text before
/// the first heading forms its own leading chunk. Empty chunks are dropped.
#[must_use]
fn split_into_h2_sections(content: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        if line.starts_with("## ") && !current.trim().is_empty() {
            sections.push(std::mem::take(&mut current).trim().to_string());
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        sections.push(current.trim().to_string());
    }

    sections
}

/// Replace the content between [`RESOLVED_SECTION_HEADING`] and the next
/// top-level-or-higher heading (or end of file) with `body`, appending a new
/// section if the heading is absent. Content outside the marked block is
/// never touched.
#[must_use]
fn inject_resolved_section(content: &str, body: &str) -> String {
    let heading_line = RESOLVED_SECTION_HEADING;
    let Some(start) = content.find(heading_line) else {
        let mut out = content.to_string();
        if !out.is_empty() {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
        }
        out.push_str(heading_line);
        out.push('\n');
        out.push_str(body);
        return out;
    };

    let after_heading = start + heading_line.len();
    let rest = &content[after_heading..];
    let end_offset = rest
        .match_indices("\n## ")
        .map(|(i, _)| i + 1)
        .next()
        .unwrap_or(rest.len());

    let mut out = String::with_capacity(content.len() + body.len());
    out.push_str(&content[..after_heading]);
    out.push('\n');
    out.push_str(body);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&rest[end_offset..]);
    out
}
