//! Positioned messages for parse failures.
//!
//! Converts byte offsets into 1-based line/column pairs and renders a short
//! code snippet around the offending span.

use crate::model::{ErrorMessage, HighlightBounds, Severity};

/// Lines of context shown on each side of the error line.
const SNIPPET_CONTEXT: u32 = 2;

/// Byte offset → 0-based `(line, column)`; columns count chars.
pub fn offset_to_line_col(source: &str, offset: usize) -> (u32, u32) {
    let mut line = 0u32;
    let mut col = 0u32;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// 1-based bounds of the byte range `start..end`.
pub fn highlight_bounds(source: &str, start: usize, end: usize) -> HighlightBounds {
    let (start_line, start_column) = offset_to_line_col(source, start);
    let (end_line, end_column) = offset_to_line_col(source, end);
    HighlightBounds {
        start_line: start_line + 1,
        start_column: start_column + 1,
        end_line: end_line + 1,
        end_column: end_column + 1,
    }
}

/// Numbered source lines around `line` (0-based), the error line marked
/// with `>`.
pub fn code_snippet(source: &str, line: u32) -> String {
    let first = line.saturating_sub(SNIPPET_CONTEXT);
    let last = line + SNIPPET_CONTEXT;
    let width = (last + 1).to_string().len();
    let mut out = String::new();
    for (i, text) in source.lines().enumerate() {
        let i = i as u32;
        if i < first {
            continue;
        }
        if i > last {
            break;
        }
        let marker = if i == line { '>' } else { ' ' };
        out.push_str(&format!("{marker} {:>width$} | {text}\n", i + 1));
    }
    out
}

/// Build an error message for the byte range `start..end` of `source`.
pub fn error_message(
    file_name: &str,
    source: &str,
    start: usize,
    end: usize,
    message: impl Into<String>,
) -> ErrorMessage {
    let bounds = highlight_bounds(source, start, end.max(start));
    ErrorMessage {
        file_name: file_name.to_string(),
        start_line: bounds.start_line,
        start_column: bounds.start_column,
        end_line: bounds.end_line,
        end_column: bounds.end_column,
        code_snippet: code_snippet(source, bounds.start_line - 1),
        severity: Severity::Error,
        message: message.into(),
        source: "parser".to_string(),
    }
}
