//! Source edits and the fix engine.
//!
//! The engine applies a batch of range-scoped edits to source text. Edits
//! are applied back-to-front so an applied edit never shifts the positions
//! of edits still to come, and the rewritten text must re-parse before it
//! is handed back.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use elm_lint_syntax::range::{Position, Range};

/// A single textual edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fix {
    /// Deletes the text covered by the range.
    Removal(Range),
    /// Replaces the text covered by the range.
    Replacement(Range, String),
    /// Inserts text at a position.
    Insertion(Position, String),
}

impl Fix {
    /// A fix that removes the given range.
    #[must_use]
    pub fn remove_range(range: Range) -> Self {
        Fix::Removal(range)
    }

    /// A fix that replaces the given range with `text`.
    #[must_use]
    pub fn replace_range_by(range: Range, text: impl Into<String>) -> Self {
        Fix::Replacement(range, text.into())
    }

    /// A fix that inserts `text` at `position`.
    #[must_use]
    pub fn insert_at(position: Position, text: impl Into<String>) -> Self {
        Fix::Insertion(position, text.into())
    }

    /// The range the fix operates on; insertions give the zero-length
    /// range `[pos, pos]`.
    #[must_use]
    pub fn range(&self) -> Range {
        match self {
            Fix::Removal(range) | Fix::Replacement(range, _) => *range,
            Fix::Insertion(position, _) => Range::new(*position, *position),
        }
    }

    fn replacement(&self) -> &str {
        match self {
            Fix::Removal(_) => "",
            Fix::Replacement(_, text) | Fix::Insertion(_, text) => text,
        }
    }
}

/// Why a fix batch could not be applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixError {
    /// Applying the batch left the source byte-for-byte identical.
    #[error("the fixes did not change the source")]
    Unchanged,
    /// The rewritten source no longer parses; the result is carried so
    /// callers can inspect it. The original source is untouched.
    #[error("the fixed source is no longer valid")]
    SourceCodeIsNotValid(String),
    /// Two fixes in the batch cover overlapping ranges.
    #[error("the fix ranges collide")]
    HasCollisionsInFixRanges,
}

/// Applies a batch of fixes to `source`.
///
/// The batch order is irrelevant: fixes are sorted by start position
/// descending before application. CRLF input is normalized to `\n`
/// internally and the original line-ending family is restored on output.
///
/// # Errors
///
/// [`FixError::HasCollisionsInFixRanges`] when any two fixes overlap,
/// [`FixError::Unchanged`] when the batch is a no-op, and
/// [`FixError::SourceCodeIsNotValid`] when the rewritten text fails to
/// parse.
pub fn apply_fixes(fixes: &[Fix], source: &str) -> Result<String, FixError> {
    for (index, a) in fixes.iter().enumerate() {
        for b in &fixes[index + 1..] {
            if a.range().collides_with(&b.range()) {
                return Err(FixError::HasCollisionsInFixRanges);
            }
        }
    }

    let uses_crlf = source.contains("\r\n");
    let normalized = if uses_crlf {
        source.replace("\r\n", "\n")
    } else {
        source.to_string()
    };

    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by(|a, b| b.range().start.cmp(&a.range().start));

    let mut lines: Vec<String> = normalized.split('\n').map(String::from).collect();
    for fix in ordered {
        trace!(range = ?fix.range(), "applying fix");
        lines = apply_single(lines, fix);
    }

    let mut result = lines.join("\n");
    if uses_crlf {
        result = result.replace('\n', "\r\n");
    }
    if result == source {
        return Err(FixError::Unchanged);
    }
    if elm_lint_syntax::parse(&result).is_err() {
        return Err(FixError::SourceCodeIsNotValid(result));
    }
    Ok(result)
}

/// Splices one fix into the line list. Columns count characters, and both
/// rows and columns are 1-based.
fn apply_single(lines: Vec<String>, fix: &Fix) -> Vec<String> {
    let range = fix.range();
    let start_row = range.start.row.clamp(1, lines.len().max(1));
    let end_row = range.end.row.clamp(start_row, lines.len().max(1));

    let start_line = lines.get(start_row - 1).map_or("", String::as_str);
    let end_line = lines.get(end_row - 1).map_or("", String::as_str);
    let prefix: String = start_line
        .chars()
        .take(range.start.column.saturating_sub(1))
        .collect();
    let suffix: String = end_line
        .chars()
        .skip(range.end.column.saturating_sub(1))
        .collect();
    let middle = format!("{prefix}{}{suffix}", fix.replacement());

    let mut out: Vec<String> = lines[..start_row - 1].to_vec();
    out.extend(middle.split('\n').map(String::from));
    if end_row < lines.len() {
        out.extend(lines[end_row..].iter().cloned());
    }
    out
}
