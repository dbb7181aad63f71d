//! Character-level edits the engine takes over from the host: backspace over
//! a whole indent unit and wrapping a selection in a trigger character.

use core_text::{BufferState, BufferStateError, TabUnit};

/// Delete one tab unit right before the caret.
///
/// `Ok(None)` when a selection exists or the text before the caret does not
/// end with a full unit; the host's ordinary backspace then applies.
pub fn delete_indent(
    state: &BufferState,
    unit: &TabUnit,
) -> Result<Option<BufferState>, BufferStateError> {
    if state.has_selection() || !state.text_before_caret().ends_with(unit.as_str()) {
        return Ok(None);
    }
    let value = state.value();
    let caret = state.selection_start() - unit.len();
    let mut next = String::with_capacity(value.len() - unit.len());
    next.push_str(&value[..caret]);
    next.push_str(&value[state.selection_end()..]);
    BufferState::caret(next, caret).map(Some)
}

/// Surround the selection with `trigger` on both sides.
///
/// The selection start stays put; the end moves past the closing trigger.
pub fn wrap_selection(state: &BufferState, trigger: char) -> Result<BufferState, BufferStateError> {
    let value = state.value();
    let start = state.selection_start();
    let end = state.selection_end();
    let width = trigger.len_utf8();
    let mut next = String::with_capacity(value.len() + 2 * width);
    next.push_str(&value[..start]);
    next.push(trigger);
    next.push_str(state.selected_text());
    next.push(trigger);
    next.push_str(&value[end..]);
    BufferState::new(next, start, end + 2 * width)
}
