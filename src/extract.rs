use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ScanError};

/// Characters that may appear inside an inline class run. All ASCII, so byte
/// positions found while scanning are always valid char boundaries.
fn is_run_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b':' | b'_' | b' ')
}

/// A candidate token within a source string, before location lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
    /// Byte offset of the token within the scanned content
    pub offset: usize,
    /// The token text
    pub text: &'a str,
}

/// Information about an extracted class token occurrence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenOccurrence {
    /// The individual class token (after splitting on spaces)
    pub value: String,
    /// Source file path (or a synthetic name such as "stdin")
    pub file_path: String,
    /// Line number in source (1-indexed)
    pub line: usize,
    /// Byte column within the line (0-indexed)
    pub column: usize,
}

/// Named extraction rules, selectable per file type in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractorKind {
    /// Contents of double-quoted string literals, split on whitespace
    Default,
    /// Inline `class:` / `class=` attribute bindings, plus the quoted
    /// attribute form those triggers also happen to match
    InlineClass,
}

impl ExtractorKind {
    /// Every registered rule, in registration order
    pub const ALL: [ExtractorKind; 2] = [ExtractorKind::Default, ExtractorKind::InlineClass];

    /// The rule's configuration name
    pub fn name(&self) -> &'static str {
        match self {
            ExtractorKind::Default => "default",
            ExtractorKind::InlineClass => "inline-class",
        }
    }

    /// Run this rule over the given content
    pub fn extract<'a>(&self, content: &'a str) -> Vec<RawToken<'a>> {
        match self {
            ExtractorKind::Default => quoted_classes(content),
            ExtractorKind::InlineClass => inline_classes(content),
        }
    }
}

/// Find the spans that follow an inline class trigger.
///
/// A trigger is the literal `class` followed by `:` or `=`, then optionally
/// `(` and/or `"`. The captured run extends from there while characters stay
/// inside the run alphabet (letters, digits, `-`, `:`, `_`, space) and stops
/// at the first character outside it, such as a closing quote or a comma.
/// The search resumes after each captured run, so a trigger that begins
/// immediately after a capture is still found.
fn inline_class_runs(content: &str) -> Vec<(usize, &str)> {
    let bytes = content.as_bytes();
    let mut runs = Vec::new();
    let mut search_from = 0;

    while let Some(found) = content[search_from..].find("class") {
        let mut pos = search_from + found + "class".len();
        search_from = pos;

        let Some(&sep) = bytes.get(pos) else {
            break;
        };
        if sep != b':' && sep != b'=' {
            continue;
        }
        pos += 1;

        if bytes.get(pos) == Some(&b'(') {
            pos += 1;
        }
        if bytes.get(pos) == Some(&b'"') {
            pos += 1;
        }

        let start = pos;
        while pos < bytes.len() && is_run_byte(bytes[pos]) {
            pos += 1;
        }
        if pos > start {
            runs.push((start, &content[start..pos]));
            search_from = pos;
        }
    }

    runs
}

/// Extract class tokens declared with the inline binding syntax
/// (`class:name=pred`, `class=("name", pred)`, `class="name"`).
///
/// Total over arbitrary input: no triggers means an empty vector. Captured
/// runs are split on spaces; empty pieces from consecutive or trailing
/// spaces are dropped.
pub fn inline_classes(content: &str) -> Vec<RawToken<'_>> {
    let mut tokens = Vec::new();
    for (offset, run) in inline_class_runs(content) {
        let mut at = 0;
        for piece in run.split(' ') {
            if !piece.is_empty() {
                tokens.push(RawToken {
                    offset: offset + at,
                    text: piece,
                });
            }
            at += piece.len() + 1;
        }
    }
    tokens
}

static QUOTED_STRING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

/// Extract class tokens from double-quoted string literals.
///
/// This models the host build tool's default rule, used for file types
/// without a configured override.
pub fn quoted_classes(content: &str) -> Vec<RawToken<'_>> {
    let base = content.as_ptr() as usize;
    let mut tokens = Vec::new();
    for caps in QUOTED_STRING_REGEX.captures_iter(content) {
        let Some(lit) = caps.get(1) else {
            continue;
        };
        for piece in lit.as_str().split_whitespace() {
            // Subslices share content's buffer, so pointer distance is the offset
            tokens.push(RawToken {
                offset: piece.as_ptr() as usize - base,
                text: piece,
            });
        }
    }
    tokens
}

/// Check whether a token is plausibly a utility-class name.
///
/// Filters out markup fragments and CSS metacharacters that the broad
/// default rule can pick up from quoted literals.
pub fn is_candidate(token: &str) -> bool {
    if token.is_empty() || token.len() > 100 {
        return false;
    }

    if token.contains('<')
        || token.contains('>')
        || token.contains('{')
        || token.contains('}')
        || token.contains(';')
    {
        return false;
    }

    token
        .chars()
        .all(|c| c.is_alphanumeric() || "-:/.[]!()#%&*_@".contains(c))
}

/// Byte offsets of line starts, for offset -> (line, column) lookup
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        let mut starts = vec![0];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        Self { starts }
    }

    /// Returns (1-indexed line, 0-indexed byte column)
    fn locate(&self, offset: usize) -> (usize, usize) {
        let line = self.starts.partition_point(|&start| start <= offset);
        (line, offset - self.starts[line - 1])
    }
}

/// Run a rule over in-memory content and resolve source locations.
pub fn occurrences_from_content(
    content: &str,
    source_name: &str,
    rule: ExtractorKind,
) -> Vec<TokenOccurrence> {
    let raw = rule.extract(content);
    if raw.is_empty() {
        return Vec::new();
    }

    let index = LineIndex::new(content);
    raw.into_iter()
        .map(|token| {
            let (line, column) = index.locate(token.offset);
            TokenOccurrence {
                value: token.text.to_string(),
                file_path: source_name.to_string(),
                line,
                column,
            }
        })
        .collect()
}

/// Read a file and run the given rule over its content.
pub fn occurrences_from_file(file_path: &Path, rule: ExtractorKind) -> Result<Vec<TokenOccurrence>> {
    let content = std::fs::read_to_string(file_path).map_err(|e| ScanError::ReadError {
        path: file_path.display().to_string(),
        message: format!("Failed to read file: {}", e),
    })?;

    if content.is_empty() {
        return Ok(Vec::new());
    }

    Ok(occurrences_from_content(
        &content,
        &file_path.display().to_string(),
        rule,
    ))
}
