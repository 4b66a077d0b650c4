//! Static substring probe tables. Declared as plain arrays (not built lazily)
//! so they are trivially unit-testable and extensible without touching the
//! classification procedure itself.

use crate::types::InsightCategory;

/// `(category, probes)` in insertion order — ties in hit count are broken by
/// position in this table.
pub const CATEGORY_PROBES: &[(InsightCategory, &[&str])] = &[
    (
        InsightCategory::Warning,
        &["never", "don't", "do not", "avoid", "forbidden", "warning", "danger"],
    ),
    (
        InsightCategory::Convention,
        &["always", "naming", "prefer", "convention", "style guide", "format"],
    ),
    (
        InsightCategory::Principle,
        &["principle", "philosophy", "guideline", "rule of thumb"],
    ),
    (
        InsightCategory::Technique,
        &["technique", "approach", "method", "how to", "implement"],
    ),
    (
        InsightCategory::Preference,
        &["prefer", "like", "favor", "rather than", "instead of"],
    ),
    (
        InsightCategory::Pattern,
        &["pattern", "idiom", "recurring", "typically"],
    ),
];

/// `(tag, probes)` covering a small domain-neutral vocabulary.
pub const TAG_PROBES: &[(&str, &[&str])] = &[
    ("testing", &["test", "testing", "unit test", "integration test", "assert"]),
    (
        "error-handling",
        &["error", "exception", "panic", "failure", "recover"],
    ),
    (
        "performance",
        &["performance", "latency", "throughput", "optimi", "slow", "fast"],
    ),
    ("security", &["security", "auth", "vulnerab", "encrypt", "secret"]),
    ("database", &["database", "sql", "query", "schema", "migration"]),
    ("api", &["api", "endpoint", "rest", "http", "request"]),
    (
        "concurrency",
        &["concurren", "thread", "async", "race condition", "lock"],
    ),
    (
        "documentation",
        &["document", "comment", "readme", "docstring"],
    ),
    ("deployment", &["deploy", "release", "ci/cd", "pipeline", "rollout"]),
    (
        "refactoring",
        &["refactor", "cleanup", "restructure", "simplify"],
    ),
];

/// `(domain, probes)` covering programming ecosystems and cross-cutting
/// concerns.
pub const DOMAIN_PROBES: &[(&str, &[&str])] = &[
    ("rust", &["rust", "cargo", "crate", "tokio", "clippy"]),
    (
        "javascript",
        &["javascript", "typescript", "npm", "node.js", "react"],
    ),
    ("python", &["python", "pip", "django", "flask", "pytest"]),
    ("go", &["golang", "go module", "goroutine"]),
    ("java", &["java ", "spring", "maven", "gradle", "jvm"]),
    ("web", &["html", "css", "browser", "frontend", "dom"]),
    ("infrastructure", &["kubernetes", "docker", "terraform", "helm", "infra"]),
    ("data", &["dataset", "pipeline", "etl", "warehouse", "analytics"]),
];
