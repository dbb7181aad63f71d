//! Navigation keys: snapshot the state before the host moves the caret, so
//! undo right after a movement returns to the pre-movement selection instead
//! of merging into the previous edit.

use super::DispatchResult;
use crate::session::EditSession;
use core_text::BufferState;

pub(crate) fn handle_motion(pre: &BufferState, session: &mut EditSession) -> DispatchResult {
    session.record_current_state(pre.clone());
    tracing::trace!(
        target: "actions.dispatch",
        op = "motion_snapshot",
        start = pre.selection_start(),
        end = pre.selection_end(),
        "motion"
    );
    DispatchResult::passthrough()
}
