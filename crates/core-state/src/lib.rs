//! Session-lifetime edit state: undo history, composition gate and time source.
//!
//! History model:
//! - `EditHistory` is a stack of full `BufferState` snapshots plus an offset
//!   pointing at the record that matches the visible buffer. Undo and redo
//!   only move the offset; recording a change drops everything above it.
//! - Plain typing is recorded with `overwrite = true`. When the previous
//!   record is younger than `HISTORY_TIME_GAP` and the new trailing word on
//!   the caret line extends the previous one, the record is replaced in place
//!   so undo removes the whole word.
//! - The stack holds at most `HISTORY_LIMIT` records; the oldest are evicted
//!   and the offset shifts down with them.
//!
//! Telemetry:
//! - Pushes, overwrites, redo truncation, eviction, undo and redo emit trace
//!   events under `state.history`; composition transitions under
//!   `state.composition`.

pub mod clock;
pub mod composition;
pub mod undo;

pub use clock::{Clock, ManualClock, SystemClock};
pub use composition::{CompositionGate, CompositionPhase};
pub use undo::{EditHistory, HISTORY_LIMIT, HISTORY_TIME_GAP, HistoryRecord, trailing_word};
