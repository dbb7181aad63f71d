//! Dispatcher applying an `Action` to an `EditSession`.
//!
//! Sub-modules:
//! * `indent` - indent / outdent / tab insertion transforms
//! * `edit`   - backspace-over-indent and selection wrapping transforms
//! * `motion` - pre-movement snapshots
//! * `undo`   - undo / redo dispatch
//!
//! Every buffer-changing action goes through `EditSession::apply_edits`,
//! which records exactly one history entry for it.

use crate::Action;
use crate::session::EditSession;
use core_text::{BufferState, BufferStateError};

pub mod edit;
pub mod indent;
mod motion;
mod undo;

/// Outcome of a key event, for the host to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    /// New buffer state to write back, when the engine changed it.
    pub state: Option<BufferState>,
    /// The host must suppress its default handling of the key.
    pub prevent_default: bool,
    /// The host should move focus away from the editor.
    pub blur: bool,
}

impl DispatchResult {
    pub fn applied(state: BufferState) -> Self {
        Self {
            state: Some(state),
            prevent_default: true,
            blur: false,
        }
    }
    /// Key consumed, nothing changed.
    pub fn suppressed() -> Self {
        Self {
            state: None,
            prevent_default: true,
            blur: false,
        }
    }
    /// Not the engine's key; default handling proceeds.
    pub fn passthrough() -> Self {
        Self {
            state: None,
            prevent_default: false,
            blur: false,
        }
    }
    pub fn blur() -> Self {
        Self {
            state: None,
            prevent_default: false,
            blur: true,
        }
    }
    pub fn changed(&self) -> bool {
        self.state.is_some()
    }
}

/// Apply `action` to `session`, where `pre` is the host state before the key.
pub fn dispatch(
    action: Action,
    pre: &BufferState,
    session: &mut EditSession,
) -> Result<DispatchResult, BufferStateError> {
    let unit = session.settings().tab_unit.clone();
    let result = match action {
        Action::IndentLines => {
            let next = indent::indent_lines(pre, &unit)?;
            session.apply_edits(pre, next, "indent")
        }
        Action::OutdentLines => match indent::outdent_lines(pre, &unit)? {
            Some(next) => session.apply_edits(pre, next, "outdent"),
            None => {
                tracing::trace!(target: "actions.dispatch", op = "outdent", "noop");
                DispatchResult::suppressed()
            }
        },
        Action::InsertTab => {
            let next = indent::insert_tab(pre, &unit)?;
            session.apply_edits(pre, next, "insert_tab")
        }
        Action::DeleteIndent => match edit::delete_indent(pre, &unit)? {
            Some(next) => session.apply_edits(pre, next, "delete_indent"),
            None => DispatchResult::passthrough(),
        },
        Action::WrapSelection(trigger) => {
            let next = edit::wrap_selection(pre, trigger)?;
            session.apply_edits(pre, next, "wrap_selection")
        }
        Action::Undo => undo::handle_undo(session),
        Action::Redo => undo::handle_redo(session),
        Action::SnapshotBeforeMotion => motion::handle_motion(pre, session),
        Action::SwallowTab => {
            tracing::trace!(target: "actions.dispatch", op = "swallow_tab", "tab_ignored");
            DispatchResult::suppressed()
        }
        Action::Blur => DispatchResult::blur(),
    };
    Ok(result)
}
