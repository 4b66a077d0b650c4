//! Glob-pattern-keyed parser registry: the lookup-by-pattern flavor of the
//! corpus's capability-trait-registry idiom, applied to "which
//! `ContextParser` handles this filename".

use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

use super::ContextParser;

/// Translate a simple glob (`*` and `?` wildcards only) into an anchored
/// regular expression.
fn glob_to_regex(glob: &str) -> Regex {
    let mut pattern = String::from("^");
    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\' => {
                pattern.push('\\');
                pattern.push(c);
            }
            other => pattern.push(other),
        }
    }
    pattern.push('$');
    Regex::new(&pattern).unwrap_or_else(|_| Regex::new("^$").expect("empty pattern always compiles"))
}

/// Maps filename glob patterns to parser implementations.
pub struct ParserRegistry {
    entries: Vec<(Regex, Arc<dyn ContextParser>)>,
    patterns: HashMap<String, usize>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            patterns: HashMap::new(),
        }
    }

    /// Register a parser for a glob pattern. Later registrations for the
    /// same pattern replace earlier ones.
    pub fn register(&mut self, glob: &str, parser: Arc<dyn ContextParser>) {
        let regex = glob_to_regex(glob);
        if let Some(&idx) = self.patterns.get(glob) {
            self.entries[idx] = (regex, parser);
        } else {
            self.patterns.insert(glob.to_string(), self.entries.len());
            self.entries.push((regex, parser));
        }
    }

    /// Find the parser registered for a pattern matching `filename`.
    #[must_use]
    pub fn lookup(&self, filename: &str) -> Option<Arc<dyn ContextParser>> {
        self.entries
            .iter()
            .find(|(regex, _)| regex.is_match(filename))
            .map(|(_, parser)| parser.clone())
    }
}
