//! The single shared negation-pair table consulted by the Accumulator's
//! contradiction probe, the Clusterer's cross-cluster scan, the Linker, and
//! the Retriever's already-represented conflict check.

/// Positive/negative phrase pairs used to heuristically detect contradictory
/// statements. A match on one side of a pair in one text and the other side
/// in a second text is treated as a negation signal.
pub const NEGATION_PAIRS: &[(&str, &str)] = &[
    ("always", "never"),
    ("do ", "don't"),
    ("use ", "avoid"),
    ("should", "should not"),
    ("prefer", "avoid"),
    ("must", "must not"),
    ("enable", "disable"),
];

/// True if `a` and `b` contain opposite halves of any negation pair. Both
/// inputs are expected to already be lowercased by the caller.
#[must_use]
pub fn is_negation_match(a_lower: &str, b_lower: &str) -> bool {
    NEGATION_PAIRS.iter().any(|(pos, neg)| {
        (a_lower.contains(pos) && b_lower.contains(neg))
            || (a_lower.contains(neg) && b_lower.contains(pos))
    })
}

/// True if `text_lower` contains either half of any negation pair — used by
/// the Retriever's already-represented conflict check against a single
/// principle's content.
#[must_use]
pub fn contains_any_negation_term(text_lower: &str) -> bool {
    NEGATION_PAIRS
        .iter()
        .any(|(pos, neg)| text_lower.contains(pos) || text_lower.contains(neg))
}
