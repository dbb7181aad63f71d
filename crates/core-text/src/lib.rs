//! Plain-text buffer snapshot and line helpers.
//!
//! A `BufferState` is the unit exchanged with the host surface: the full text
//! under edit plus a byte-offset selection. Offsets always sit on UTF-8
//! character boundaries and satisfy `start <= end <= value.len()`; the only way
//! to build a `BufferState` is through constructors that check this, so every
//! engine entry point can rely on it.

use std::fmt;
use thiserror::Error;

pub mod lines;
pub mod tab;

pub use lines::{LineSpan, current_line, line_span, line_start, lines_before};
pub use tab::TabUnit;

/// Reasons a `(value, selection_start, selection_end)` triple is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferStateError {
    #[error("selection start {start} is after selection end {end}")]
    Inverted { start: usize, end: usize },
    #[error("selection end {end} exceeds buffer length {len}")]
    OutOfBounds { end: usize, len: usize },
    #[error("offset {offset} is not on a UTF-8 character boundary")]
    NotCharBoundary { offset: usize },
}

/// Text content plus selection range. `selection_start == selection_end` is a caret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BufferState {
    value: String,
    selection_start: usize,
    selection_end: usize,
}

impl BufferState {
    pub fn new(
        value: impl Into<String>,
        selection_start: usize,
        selection_end: usize,
    ) -> Result<Self, BufferStateError> {
        let value = value.into();
        validate(&value, selection_start, selection_end)?;
        Ok(Self {
            value,
            selection_start,
            selection_end,
        })
    }

    /// Collapsed selection at `at`.
    pub fn caret(value: impl Into<String>, at: usize) -> Result<Self, BufferStateError> {
        Self::new(value, at, at)
    }

    /// Empty buffer with the caret at the origin.
    pub fn empty() -> Self {
        Self {
            value: String::new(),
            selection_start: 0,
            selection_end: 0,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_value(self) -> String {
        self.value
    }

    pub fn selection_start(&self) -> usize {
        self.selection_start
    }

    pub fn selection_end(&self) -> usize {
        self.selection_end
    }

    pub fn has_selection(&self) -> bool {
        self.selection_start != self.selection_end
    }

    pub fn selected_text(&self) -> &str {
        &self.value[self.selection_start..self.selection_end]
    }

    /// Text from buffer start up to the selection start.
    pub fn text_before_caret(&self) -> &str {
        &self.value[..self.selection_start]
    }

    /// Same value, different selection. Checked against the existing value.
    pub fn with_selection(&self, start: usize, end: usize) -> Result<Self, BufferStateError> {
        validate(&self.value, start, end)?;
        Ok(Self {
            value: self.value.clone(),
            selection_start: start,
            selection_end: end,
        })
    }
}

impl Default for BufferState {
    fn default() -> Self {
        Self::empty()
    }
}

// Values can be large; keep debug output to lengths and selection.
impl fmt::Debug for BufferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferState")
            .field("len", &self.value.len())
            .field("selection_start", &self.selection_start)
            .field("selection_end", &self.selection_end)
            .finish()
    }
}

fn validate(value: &str, start: usize, end: usize) -> Result<(), BufferStateError> {
    if start > end {
        return Err(BufferStateError::Inverted { start, end });
    }
    if end > value.len() {
        return Err(BufferStateError::OutOfBounds {
            end,
            len: value.len(),
        });
    }
    for offset in [start, end] {
        if !value.is_char_boundary(offset) {
            return Err(BufferStateError::NotCharBoundary { offset });
        }
    }
    Ok(())
}

/// Grapheme boundary helpers for hosts that apply default caret behavior.
pub mod grapheme {
    use unicode_segmentation::UnicodeSegmentation;

    /// Previous grapheme boundary (returns 0 if already at or below 1st boundary).
    pub fn prev_boundary(text: &str, byte: usize) -> usize {
        if byte == 0 || byte > text.len() {
            return 0;
        }
        let mut last = 0;
        for (idx, _) in text.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Next grapheme boundary (returns text.len() if at or beyond end).
    pub fn next_boundary(text: &str, byte: usize) -> usize {
        if byte >= text.len() {
            return text.len();
        }
        for (idx, _) in text.grapheme_indices(true) {
            if idx > byte {
                return idx;
            }
        }
        text.len()
    }
}
