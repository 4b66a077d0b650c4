//! Splits a context file into ordered, identity-stable fragments.

mod markdown;
mod registry;

pub use markdown::{split_into_sections, RawSection};
pub use registry::ParserRegistry;

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::constants::MAX_FILE_SIZE_BYTES;
use crate::error::{Error, Result};
use crate::types::Fragment;

/// Parses one recognized file format into fragments.
pub trait ContextParser: Send + Sync {
    /// Read and split `path` into fragments.
    ///
    /// # Errors
    /// Returns [`Error::InputValidation`] if the file exceeds
    /// [`MAX_FILE_SIZE_BYTES`], and [`Error::Parse`] for I/O or encoding
    /// failures.
    fn parse(&self, path: &Path) -> Result<Vec<Fragment>>;
}

/// The default H2-delimited markdown parser.
pub struct MarkdownParser;

impl ContextParser for MarkdownParser {
    fn parse(&self, path: &Path) -> Result<Vec<Fragment>> {
        let metadata = std::fs::metadata(path).map_err(|e| Error::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if metadata.len() > MAX_FILE_SIZE_BYTES {
            return Err(Error::InputValidation(format!(
                "{} exceeds the {} byte cap (too_large)",
                path.display(),
                MAX_FILE_SIZE_BYTES
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let file_hash = hex_sha256(content.as_bytes());
        let source_path = path.display().to_string();
        let source_project = Fragment::project_for_path(path);
        let now = Utc::now();

        let sections = split_into_sections(&content);
        Ok(sections
            .into_iter()
            .map(|section| Fragment {
                id: Fragment::compute_id(&source_path, &section.content),
                content: section.content,
                source_path: source_path.clone(),
                source_project: source_project.clone(),
                section_heading: section.heading,
                line_range: section.line_range,
                file_hash: file_hash.clone(),
                extracted_at: now,
            })
            .collect())
    }
}

fn hex_sha256(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Compute the whole-file hash the Accumulator compares against
/// `WatchedProject::file_hash` to detect an unchanged file, without paying
/// for a full parse.
///
/// # Errors
/// Returns [`Error::Parse`] if the file cannot be read.
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(|e| Error::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(hex_sha256(&content))
}

/// Recursively walk `dir`, parsing every file whose name matches a pattern
/// in `registry`, and concatenate the results.
///
/// # Errors
/// Returns the first parse error encountered; directory traversal errors are
/// wrapped as [`Error::Parse`].
pub fn parse_directory(dir: &Path, registry: &ParserRegistry) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let entries = std::fs::read_dir(&current).map_err(|e| Error::Parse {
            path: current.display().to_string(),
            reason: e.to_string(),
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::Parse {
                path: current.display().to_string(),
                reason: e.to_string(),
            })?;
            let path: PathBuf = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let Some(filename) = path.file_name().and_then(|f| f.to_str()) else {
                continue;
            };
            if let Some(parser) = registry.lookup(filename) {
                fragments.extend(parser.parse(&path)?);
            }
        }
    }
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_simple_file_into_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CONTEXT.md");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# Title\n\n## Rules\n\nAlways use pattern matching.").unwrap();

        let parser = MarkdownParser;
        let fragments = parser.parse(&path).unwrap();
        assert_eq!(fragments.len(), 2);
        assert!(fragments[1].content.contains("pattern matching"));
    }

    #[test]
    fn oversize_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BIG.md");
        let mut file = std::fs::File::create(&path).unwrap();
        let oversized = "x".repeat(MAX_FILE_SIZE_BYTES as usize + 1);
        file.write_all(oversized.as_bytes()).unwrap();

        let parser = MarkdownParser;
        let err = parser.parse(&path).unwrap_err();
        assert!(matches!(err, Error::InputValidation(_)));
    }

    #[test]
    fn empty_file_parses_to_no_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EMPTY.md");
        std::fs::File::create(&path).unwrap();

        let parser = MarkdownParser;
        let fragments = parser.parse(&path).unwrap();
        assert!(fragments.is_empty());
    }
}
