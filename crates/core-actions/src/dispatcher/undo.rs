//! Undo / redo dispatch.
//!
//! The chord is always consumed, even with nothing to undo, so the host's
//! own textarea history never runs alongside ours.

use super::DispatchResult;
use crate::session::EditSession;

pub(crate) fn handle_undo(session: &mut EditSession) -> DispatchResult {
    match session.undo() {
        Some(state) => DispatchResult::applied(state),
        None => {
            tracing::trace!(target: "actions.dispatch", op = "undo", "nothing_to_undo");
            DispatchResult::suppressed()
        }
    }
}

pub(crate) fn handle_redo(session: &mut EditSession) -> DispatchResult {
    match session.redo() {
        Some(state) => DispatchResult::applied(state),
        None => {
            tracing::trace!(target: "actions.dispatch", op = "redo", "nothing_to_redo");
            DispatchResult::suppressed()
        }
    }
}
