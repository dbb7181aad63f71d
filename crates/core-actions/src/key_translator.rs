//! Key -> Action translation.
//!
//! Precedence follows the order below; the first match wins and `None`
//! means the host's default handling proceeds untouched:
//! 1. `Esc` releases focus.
//! 2. `Tab` outside a composition: `Shift+Tab` outdents, a selection is
//!    indented, a caret gets a tab unit. With `ignore_tab_key` an unmodified
//!    Tab is swallowed instead. No later rule sees a Tab, so undo/redo never
//!    fire from a Tab chord.
//! 3. `Backspace` with a full tab unit before a bare caret deletes the unit.
//! 4. Navigation keys snapshot the pre-movement state.
//! 5. Undo / redo chords on the platform's primary modifier.
//! 6. A wrap trigger typed over a non-empty selection.

use crate::Action;
use core_config::{EditSettings, PlatformFamily};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_text::BufferState;

const COMMAND_MODS: KeyModifiers = KeyModifiers::CTRL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::META);

/// Per-event inputs the translation depends on besides the key itself.
#[derive(Debug, Clone, Copy)]
pub struct KeyContext<'a> {
    pub settings: &'a EditSettings,
    /// An input-method composition is in flight.
    pub composing: bool,
}

pub fn translate_key(key: &KeyEvent, state: &BufferState, ctx: &KeyContext<'_>) -> Option<Action> {
    let unit = &ctx.settings.tab_unit;
    match key.code {
        KeyCode::Esc => return Some(Action::Blur),
        KeyCode::Tab if !ctx.composing => {
            if ctx.settings.ignore_tab_key {
                if key.mods.intersects(COMMAND_MODS) {
                    return None;
                }
                return Some(Action::SwallowTab);
            }
            return Some(if key.shift() {
                Action::OutdentLines
            } else if state.has_selection() {
                Action::IndentLines
            } else {
                Action::InsertTab
            });
        }
        KeyCode::Backspace => {
            if !state.has_selection() && state.text_before_caret().ends_with(unit.as_str()) {
                return Some(Action::DeleteIndent);
            }
            return None;
        }
        code if code.is_navigation() => return Some(Action::SnapshotBeforeMotion),
        _ => {}
    }

    if let Some(action) = history_chord(key, ctx.settings.platform) {
        return Some(action);
    }
    if let KeyCode::Char(c) = key.code
        && !key.mods.intersects(COMMAND_MODS)
        && ctx.settings.is_wrap_trigger(c)
        && state.has_selection()
    {
        return Some(Action::WrapSelection(c));
    }
    None
}

/// Primary modifier held without the other command modifier or Alt.
fn primary_modifier_only(key: &KeyEvent, platform: PlatformFamily) -> bool {
    let (primary, other) = match platform {
        PlatformFamily::Mac => (KeyModifiers::META, KeyModifiers::CTRL),
        _ => (KeyModifiers::CTRL, KeyModifiers::META),
    };
    key.mods.contains(primary) && !key.mods.intersects(other | KeyModifiers::ALT)
}

fn history_chord(key: &KeyEvent, platform: PlatformFamily) -> Option<Action> {
    if !primary_modifier_only(key, platform) {
        return None;
    }
    if key.is_char_ignore_case('z') {
        return Some(if key.shift() { Action::Redo } else { Action::Undo });
    }
    if key.is_char_ignore_case('y') && !key.shift() && platform == PlatformFamily::Windows {
        return Some(Action::Redo);
    }
    None
}
