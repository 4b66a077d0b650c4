//! Renders retrieved principles into the markdown block the Resolver injects
//! into a target file.

use crate::retriever::RetrievedPrinciple;

/// Converts a set of retrieved principles into the rendered sections
/// injected under the resolved-knowledge heading. Pluggable so a deployment
/// can swap in an agent- or tool-specific rendering without touching the
/// Resolver.
pub trait Formatter: Send + Sync {
    /// Render `kept` and `conflicts` into the body text placed under the
    /// resolved-knowledge heading, excluding the heading itself.
    fn format_sections(&self, kept: &[RetrievedPrinciple], conflicts: &[RetrievedPrinciple]) -> String;

    /// Soft cap on output size, in approximate tokens (4 characters each),
    /// used to decide how many lower-ranked principles to drop before
    /// rendering.
    fn max_output_tokens(&self) -> usize {
        2_000
    }
}

/// The default renderer: one bullet per principle, conflicts prefixed and
/// listed after the kept set.
pub struct MarkdownFormatter {
    max_output_tokens: usize,
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self { max_output_tokens: 2_000 }
    }
}

impl MarkdownFormatter {
    /// Build a formatter with an explicit token budget.
    #[must_use]
    pub fn with_max_output_tokens(max_output_tokens: usize) -> Self {
        Self { max_output_tokens }
    }

    fn render_bullet(entry: &RetrievedPrinciple, prefix: &str) -> String {
        let mut line = format!("- {prefix}{}", entry.principle.content);
        if !entry.principle.tags.is_empty() {
            let mut tags: Vec<&str> = entry.principle.tags.iter().map(String::as_str).collect();
            tags.sort_unstable();
            line.push_str(&format!(" _(tags: {})_", tags.join(", ")));
        }
        line
    }
}

impl Formatter for MarkdownFormatter {
    fn format_sections(&self, kept: &[RetrievedPrinciple], conflicts: &[RetrievedPrinciple]) -> String {
        let budget_chars = self.max_output_tokens.saturating_mul(4);
        let mut out = String::new();

        for entry in kept {
            let line = Self::render_bullet(entry, "");
            if out.len() + line.len() > budget_chars {
                break;
            }
            out.push_str(&line);
            out.push('\n');
        }

        for entry in conflicts {
            let line = Self::render_bullet(entry, "[CONFLICT] ");
            if out.len() + line.len() > budget_chars {
                break;
            }
            out.push_str(&line);
            out.push('\n');
        }

        out
    }

    fn max_output_tokens(&self) -> usize {
        self.max_output_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Principle, PrincipleCategory, PrincipleStatus};
    use std::collections::HashSet;

    fn entry(content: &str) -> RetrievedPrinciple {
        let now = chrono::Utc::now();
        RetrievedPrinciple {
            principle: Principle {
                id: uuid::Uuid::new_v4(),
                content: content.into(),
                elaboration: None,
                content_hash: "hash".into(),
                embedding: None,
                category: PrincipleCategory::Learning,
                tags: HashSet::new(),
                domains: HashSet::new(),
                confidence: 0.8,
                frequency: 1,
                recency_score: 1.0,
                source_quality: 0.5,
                rank: 0.5,
                status: PrincipleStatus::Active,
                created_at: now,
                updated_at: now,
            },
            score: 0.8,
            similarity: Some(0.9),
        }
    }

    #[test]
    fn conflicts_are_prefixed_and_rendered_after_kept() {
        let formatter = MarkdownFormatter::default();
        let kept = vec![entry("use small functions")];
        let conflicts = vec![entry("never use small functions")];
        let rendered = formatter.format_sections(&kept, &conflicts);
        let kept_pos = rendered.find("use small functions").unwrap();
        let conflict_pos = rendered.find("[CONFLICT]").unwrap();
        assert!(conflict_pos > kept_pos);
    }

    #[test]
    fn empty_input_renders_empty_string() {
        let formatter = MarkdownFormatter::default();
        assert_eq!(formatter.format_sections(&[], &[]), "");
    }
}
