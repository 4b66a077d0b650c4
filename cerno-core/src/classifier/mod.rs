//! Heuristic content classification: category, tags, and domain assigned
//! from lowercase substring signals.

mod probes;

use crate::constants::MAX_TAGS;
use crate::types::InsightCategory;
use std::collections::HashSet;

pub use probes::{CATEGORY_PROBES, DOMAIN_PROBES, TAG_PROBES};

/// Output of classifying one piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Assigned category; defaults to [`InsightCategory::Fact`] when no
    /// probe matches.
    pub category: InsightCategory,
    /// Deduplicated tags, capped at [`MAX_TAGS`].
    pub tags: HashSet<String>,
    /// Assigned domain, absent when no probe matches.
    pub domain: Option<String>,
}

/// An optional LLM-backed classifier, consulted ahead of or instead of the
/// heuristic tables. Not implemented here — an out-of-scope collaborator
/// consumed through this trait by deployments that wire one in.
#[async_trait::async_trait]
pub trait LlmClassifier: Send + Sync {
    /// Classify `text`, returning the same shape the heuristic path
    /// produces.
    async fn classify(&self, text: &str) -> crate::error::Result<Classification>;
}

/// Count substring hits for each entry in a probe table, keep entries with
/// at least one hit, and return them ordered by descending hit count with
/// ties broken by table insertion order (a stable sort preserves this).
fn ranked_hits<'a, T: Copy>(haystack: &str, probes: &'a [(T, &[&str])]) -> Vec<(T, usize)> {
    let mut hits: Vec<(T, usize)> = probes
        .iter()
        .map(|(key, patterns)| {
            let count = patterns.iter().filter(|p| haystack.contains(*p)).count();
            (*key, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();
    hits.sort_by(|a, b| b.1.cmp(&a.1));
    hits
}

/// Classify raw text (content with an optional heading, already concatenated
/// by the caller via [`classify_fragment`] or used directly for the
/// Retriever's paragraph/domain detection).
#[must_use]
pub fn classify_text(content: &str, heading: Option<&str>) -> Classification {
    let mut haystack = content.to_lowercase();
    if let Some(h) = heading {
        haystack.push(' ');
        haystack.push_str(&h.to_lowercase());
    }

    let category = ranked_hits(&haystack, CATEGORY_PROBES)
        .first()
        .map(|(cat, _)| *cat)
        .unwrap_or_default();

    let domain = ranked_hits(&haystack, DOMAIN_PROBES)
        .first()
        .map(|(d, _): &(&str, usize)| (*d).to_string());

    let mut tags: Vec<String> = ranked_hits(&haystack, TAG_PROBES)
        .into_iter()
        .map(|(tag, _)| tag.to_string())
        .collect();
    if let Some(h) = heading {
        if !h.trim().is_empty() {
            tags.push(h.trim().to_lowercase());
        }
    }
    let mut seen = HashSet::new();
    tags.retain(|t| seen.insert(t.clone()));
    tags.truncate(MAX_TAGS);

    Classification {
        category,
        tags: tags.into_iter().collect(),
        domain,
    }
}

/// Classify a parsed [`crate::types::Fragment`].
#[must_use]
pub fn classify_fragment(fragment: &crate::types::Fragment) -> Classification {
    classify_text(&fragment.content, fragment.section_heading.as_deref())
}
