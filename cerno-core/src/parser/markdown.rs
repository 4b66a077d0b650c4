//! H2-delimited markdown section splitting, independent of file I/O so the
//! splitting rules are unit-testable on raw strings.

/// One raw section before fragment-ID assignment: heading, trimmed content,
/// and its one-based inclusive line range in the source.
pub struct RawSection {
    /// Heading text, absent for the leading preamble.
    pub heading: Option<String>,
    /// Trimmed section content.
    pub content: String,
    /// One-based inclusive `(start, end)` line range.
    pub line_range: (usize, usize),
}

fn is_h2_heading(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    trimmed.strip_prefix("## ").map(str::trim_end)
}

/// Split `content` on H2 markdown headings. The text before the first
/// heading forms a section with an absent heading; each heading opens a new
/// section absorbing lines until the next heading or EOF. Sections whose
/// trimmed content is empty are dropped.
#[must_use]
pub fn split_into_sections(content: &str) -> Vec<RawSection> {
    let lines: Vec<&str> = content.lines().collect();
    let mut sections = Vec::new();

    let mut current_heading: Option<String> = None;
    let mut current_lines: Vec<&str> = Vec::new();
    let mut current_start = 1usize;

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        if let Some(heading) = is_h2_heading(line) {
            flush_section(
                &mut sections,
                current_heading.take(),
                &current_lines,
                current_start,
                line_no.saturating_sub(1).max(current_start),
            );
            current_heading = Some(heading.to_string());
            current_lines = Vec::new();
            current_start = line_no;
        } else {
            current_lines.push(line);
        }
    }
    let last_line = lines.len();
    flush_section(&mut sections, current_heading, &current_lines, current_start, last_line.max(current_start));

    sections
}

fn flush_section(
    sections: &mut Vec<RawSection>,
    heading: Option<String>,
    body_lines: &[&str],
    start: usize,
    end: usize,
) {
    let body = body_lines.join("\n");
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return;
    }
    // The heading itself occupies `start`; its body begins on `start + 1`
    // when a heading is present, but the recorded range always covers the
    // heading line through the section's last body line for addressability.
    let content = if let Some(h) = &heading {
        format!("## {h}\n\n{trimmed}")
    } else {
        trimmed.to_string()
    };
    sections.push(RawSection {
        heading,
        content,
        line_range: (start, end.max(start)),
    });
}
