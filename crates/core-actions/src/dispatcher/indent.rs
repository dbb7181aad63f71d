//! Line indentation: indent / outdent a selection's lines and insert a tab unit.
//!
//! Pure transforms over `BufferState`; recording happens in the dispatcher.
//! Line ranges come from `core_text::line_span`, so a selection ending right
//! after a newline also touches the following (empty-prefix) line.

use core_text::{
    BufferState, BufferStateError, LineSpan, TabUnit, current_line, line_span, lines_before,
};

/// Rebuild `value` line by line, passing lines inside `span` through `edit`.
fn map_lines<F>(value: &str, span: LineSpan, extra: usize, mut edit: F) -> String
where
    F: FnMut(usize, &str, &mut String),
{
    let mut out = String::with_capacity(value.len() + extra);
    for (idx, line) in value.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        if span.contains(idx) {
            edit(idx, line, &mut out);
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Prefix every selected line with one tab unit.
///
/// The selection start only moves when the first line already had
/// non-whitespace text before it; the end moves by one unit per line.
pub fn indent_lines(state: &BufferState, unit: &TabUnit) -> Result<BufferState, BufferStateError> {
    let value = state.value();
    let start = state.selection_start();
    let end = state.selection_end();
    let before_start = lines_before(value, start);
    let span = line_span(value, start, end);
    let start_line_text = before_start[span.start_line];

    let next = map_lines(value, span, unit.len() * span.len(), |_, line, out| {
        out.push_str(unit.as_str());
        out.push_str(line);
    });

    let selection_start = if start_line_text.chars().any(|c| !c.is_whitespace()) {
        start + unit.len()
    } else {
        start
    };
    let selection_end = end + unit.len() * span.len();
    BufferState::new(next, selection_start, selection_end)
}

/// Strip one leading tab unit from every selected line that has one.
///
/// Returns `Ok(None)` when no line changed. The start moves back one unit
/// when the first line's text before it begins with the unit; the end moves
/// back by every byte removed. Like a textarea, an end that would fall before
/// zero or before the start is clamped and drags the start with it.
pub fn outdent_lines(
    state: &BufferState,
    unit: &TabUnit,
) -> Result<Option<BufferState>, BufferStateError> {
    let value = state.value();
    let start = state.selection_start();
    let end = state.selection_end();
    let span = line_span(value, start, end);

    let mut changed = false;
    let next = map_lines(value, span, 0, |_, line, out| match line.strip_prefix(unit.as_str()) {
        Some(rest) => {
            changed = true;
            out.push_str(rest);
        }
        None => out.push_str(line),
    });
    if !changed {
        return Ok(None);
    }

    let removed = value.len() - next.len();
    let selection_start = if current_line(value, start).starts_with(unit.as_str()) {
        start - unit.len()
    } else {
        start
    };
    let selection_end = floor_char_boundary(&next, end.saturating_sub(removed).min(next.len()));
    let selection_start = floor_char_boundary(&next, selection_start.min(selection_end));
    BufferState::new(next, selection_start, selection_end).map(Some)
}

fn floor_char_boundary(text: &str, mut at: usize) -> usize {
    while !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

/// Replace the (empty) selection with one tab unit and put the caret after it.
pub fn insert_tab(state: &BufferState, unit: &TabUnit) -> Result<BufferState, BufferStateError> {
    let value = state.value();
    let start = state.selection_start();
    let end = state.selection_end();
    let mut next = String::with_capacity(value.len() + unit.len());
    next.push_str(&value[..start]);
    next.push_str(unit.as_str());
    next.push_str(&value[end..]);
    BufferState::caret(next, start + unit.len())
}
