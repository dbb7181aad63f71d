//! IME composition tracking.
//!
//! While a composition is in flight the intermediate text changes are not
//! recorded; the session records one snapshot when the composition ends.

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositionPhase {
    #[default]
    Idle,
    Composing,
}

#[derive(Debug, Default)]
pub struct CompositionGate {
    phase: CompositionPhase,
}

impl CompositionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CompositionPhase {
        self.phase
    }

    /// True when text changes may be recorded (no composition in progress).
    pub fn capturing(&self) -> bool {
        matches!(self.phase, CompositionPhase::Idle)
    }

    /// `Idle -> Composing`. A repeated start while composing is ignored.
    pub fn start(&mut self) {
        if matches!(self.phase, CompositionPhase::Composing) {
            trace!(target: "state.composition", "start_while_composing");
            return;
        }
        self.phase = CompositionPhase::Composing;
        trace!(target: "state.composition", "composition_start");
    }

    /// `Composing -> Idle`. Returns whether a composition was actually open.
    pub fn end(&mut self) -> bool {
        let was_composing = matches!(self.phase, CompositionPhase::Composing);
        self.phase = CompositionPhase::Idle;
        trace!(target: "state.composition", was_composing, "composition_end");
        was_composing
    }
}
