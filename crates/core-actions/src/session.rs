//! One editor session: current buffer, history, composition gate and settings.
//!
//! The host owns the visible text surface. Before every event it passes its
//! current `BufferState`; whatever state the session returns must be written
//! back. All entry points run to completion synchronously and must be called
//! from a single thread of control, in event order.

use crate::dispatcher::{self, DispatchResult};
use crate::key_translator::{KeyContext, translate_key};
use core_config::EditSettings;
use core_events::KeyEvent;
use core_state::{Clock, CompositionGate, EditHistory, SystemClock};
use core_text::{BufferState, BufferStateError};
use tracing::{debug, trace};

pub struct EditSession {
    buffer: BufferState,
    history: EditHistory,
    gate: CompositionGate,
    settings: EditSettings,
    clock: Box<dyn Clock>,
}

impl EditSession {
    /// Start a session and record `initial` as the first history entry.
    pub fn new(initial: BufferState, settings: EditSettings) -> Self {
        Self::with_clock(initial, settings, SystemClock)
    }

    pub fn with_clock(
        initial: BufferState,
        settings: EditSettings,
        clock: impl Clock + 'static,
    ) -> Self {
        let mut session = Self {
            buffer: initial.clone(),
            history: EditHistory::new(),
            gate: CompositionGate::new(),
            settings,
            clock: Box::new(clock),
        };
        debug!(
            target: "actions.session",
            len = initial.value().len(),
            tab_unit_len = session.settings.tab_unit.len(),
            platform = ?session.settings.platform,
            "session_start"
        );
        session.record_current_state(initial);
        session
    }

    pub fn buffer(&self) -> &BufferState {
        &self.buffer
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn settings(&self) -> &EditSettings {
        &self.settings
    }

    pub fn is_composing(&self) -> bool {
        !self.gate.capturing()
    }

    /// Whether a Tab key press currently indents rather than being ignored or passed on.
    pub fn tab_intercepted(&self) -> bool {
        !self.settings.ignore_tab_key && self.gate.capturing()
    }

    /// Handle a key event against the host's pre-event `state`.
    pub fn apply_key_event(
        &mut self,
        state: BufferState,
        key: &KeyEvent,
    ) -> Result<DispatchResult, BufferStateError> {
        let ctx = KeyContext {
            settings: &self.settings,
            composing: self.is_composing(),
        };
        let action = translate_key(key, &state, &ctx);
        self.buffer = state.clone();
        match action {
            Some(action) => {
                trace!(target: "actions.dispatch", %key, ?action, "key");
                dispatcher::dispatch(action, &state, self)
            }
            None => Ok(DispatchResult::passthrough()),
        }
    }

    /// Record a plain edit the host already applied (typing, deletion, paste).
    ///
    /// Eligible for word coalescing. Not recorded while composing; the
    /// composition end records the final state instead.
    pub fn apply_text_change(&mut self, state: BufferState) -> &BufferState {
        if self.gate.capturing() {
            let now = self.clock.now();
            self.history.record_change_at(state.clone(), true, now);
        } else {
            trace!(target: "actions.session", len = state.value().len(), "change_during_composition");
        }
        self.buffer = state;
        &self.buffer
    }

    pub fn notify_composition_start(&mut self) {
        self.gate.start();
    }

    /// Close the composition and record `state` as one history entry.
    pub fn notify_composition_end(&mut self, state: BufferState) -> &BufferState {
        self.gate.end();
        self.record_current_state(state.clone());
        self.buffer = state;
        &self.buffer
    }

    /// Snapshot `state` as its own history step.
    pub fn record_current_state(&mut self, state: BufferState) {
        let now = self.clock.now();
        self.history.record_current_state_at(state, now);
    }

    pub fn undo(&mut self) -> Option<BufferState> {
        let state = self.history.undo()?;
        self.buffer = state.clone();
        Some(state)
    }

    pub fn redo(&mut self) -> Option<BufferState> {
        let state = self.history.redo()?;
        self.buffer = state.clone();
        Some(state)
    }

    /// Record an engine-computed edit.
    ///
    /// The current record first takes the pre-event selection so undo lands
    /// on what the user had selected, then `next` is appended.
    pub(crate) fn apply_edits(
        &mut self,
        pre: &BufferState,
        next: BufferState,
        op: &'static str,
    ) -> DispatchResult {
        if !self
            .history
            .amend_selection(pre.selection_start(), pre.selection_end())
        {
            debug!(
                target: "actions.session",
                op,
                start = pre.selection_start(),
                end = pre.selection_end(),
                "edit_without_selection_amend"
            );
        }
        let now = self.clock.now();
        self.history.record_change_at(next.clone(), false, now);
        tracing::trace!(
            target: "actions.dispatch",
            op,
            start = pre.selection_start(),
            end = pre.selection_end(),
            to_start = next.selection_start(),
            to_end = next.selection_end(),
            "edit"
        );
        self.buffer = next.clone();
        DispatchResult::applied(next)
    }
}
