//! Line splitting relative to a caret offset.
//!
//! These helpers only ever look at `text[..position]`; the caller derives
//! `position` from a validated selection so slicing cannot fail.

/// Lines from buffer start up to `position`, split on `'\n'`.
///
/// The result is never empty: `len() - 1` is the zero-based index of the
/// line containing `position` and the last element is that line's text up to
/// `position`.
pub fn lines_before(text: &str, position: usize) -> Vec<&str> {
    text[..position].split('\n').collect()
}

/// Byte offset of the start of the line containing `position`.
pub fn line_start(text: &str, position: usize) -> usize {
    text[..position].rfind('\n').map_or(0, |idx| idx + 1)
}

/// Text of the line containing `position`, up to `position`.
///
/// Equivalent to the last element of [`lines_before`] without collecting.
pub fn current_line(text: &str, position: usize) -> &str {
    &text[line_start(text, position)..position]
}

/// Inclusive range of zero-based line indices touched by a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start_line: usize,
    pub end_line: usize,
}

impl LineSpan {
    pub fn contains(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Number of lines in the span (always at least one).
    pub fn len(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// Lines spanned by `[start, end]`.
pub fn line_span(text: &str, start: usize, end: usize) -> LineSpan {
    LineSpan {
        start_line: lines_before(text, start).len() - 1,
        end_line: lines_before(text, end).len() - 1,
    }
}
