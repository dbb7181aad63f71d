use core_text::{BufferState, current_line};
use regex::Regex;
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::trace;

/// Maximum number of records retained in history.
pub const HISTORY_LIMIT: usize = 100;

/// Two records further apart than this never coalesce.
pub const HISTORY_TIME_GAP: Duration = Duration::from_millis(3000);

// Last ASCII alphanumeric run on the line, preceded by any other character.
// Spelled out without `(?i)`: Unicode case folding would admit `ſ` and `K`.
static TRAILING_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9]([A-Za-z0-9]+)$").expect("trailing word pattern is valid")
});

/// Trailing word on the line containing `position`, looking only at text before it.
///
/// A word at the very start of a line has no preceding separator and does not match.
pub fn trailing_word(text: &str, position: usize) -> Option<&str> {
    TRAILING_WORD
        .captures(current_line(text, position))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A buffer snapshot stamped with the time it was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub state: BufferState,
    pub at: Instant,
}

/// Snapshot stack with a cursor (`offset`) pointing at the current record.
///
/// Records below the offset are undo targets, records above it redo targets.
/// `offset` is `None` only while the stack is empty.
#[derive(Debug, Default)]
pub struct EditHistory {
    stack: Vec<HistoryRecord>,
    offset: Option<usize>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.stack
    }

    /// Record at the current offset.
    pub fn current(&self) -> Option<&HistoryRecord> {
        self.offset.and_then(|o| self.stack.get(o))
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.offset, Some(o) if o > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.offset, Some(o) if o + 1 < self.stack.len())
    }

    /// Record `record` stamped with the current time.
    pub fn record_change(&mut self, record: BufferState, overwrite: bool) {
        self.record_change_at(record, overwrite, Instant::now());
    }

    /// Record `record` at `at`.
    ///
    /// Redo entries beyond the offset are dropped first. With `overwrite`, the
    /// current record is replaced in place when it is younger than
    /// [`HISTORY_TIME_GAP`] and the new trailing word extends the old one;
    /// otherwise a new record is appended. The stack is then trimmed to
    /// [`HISTORY_LIMIT`] from the front.
    pub fn record_change_at(&mut self, record: BufferState, overwrite: bool, at: Instant) {
        if let Some(offset) = self.offset {
            let dropped = self.stack.len().saturating_sub(offset + 1);
            self.stack.truncate(offset + 1);
            if dropped > 0 {
                trace!(target: "state.history", dropped, offset, "redo_truncated");
            }
        }

        if overwrite
            && let Some(offset) = self.offset
            && let Some(last) = self.stack.get(offset)
            && Self::continues_word(last, &record, at)
        {
            self.stack[offset] = HistoryRecord { state: record, at };
            trace!(target: "state.history", offset, depth = self.stack.len(), "overwrite");
            return;
        }

        self.stack.push(HistoryRecord { state: record, at });
        let offset = self.offset.map_or(0, |o| o + 1);
        self.offset = Some(offset);
        trace!(target: "state.history", offset, depth = self.stack.len(), overwrite, "push");
        self.trim();
    }

    /// Snapshot `current` as its own history step.
    pub fn record_current_state(&mut self, current: BufferState) {
        self.record_change(current, false);
    }

    pub fn record_current_state_at(&mut self, current: BufferState, at: Instant) {
        self.record_change_at(current, false, at);
    }

    /// Replace the selection of the current record, keeping its value and timestamp.
    ///
    /// Returns `false` (and leaves the record untouched) when there is no
    /// current record or the selection does not fit its value.
    pub fn amend_selection(&mut self, start: usize, end: usize) -> bool {
        let Some(offset) = self.offset else {
            return false;
        };
        let Some(last) = self.stack.get_mut(offset) else {
            return false;
        };
        match last.state.with_selection(start, end) {
            Ok(state) => {
                last.state = state;
                true
            }
            Err(err) => {
                trace!(target: "state.history", offset, %err, "amend_selection_skipped");
                false
            }
        }
    }

    /// Step back one record. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<BufferState> {
        let offset = self.offset?;
        let target = offset.checked_sub(1)?;
        let record = self.stack.get(target)?.state.clone();
        self.offset = Some(target);
        trace!(target: "state.history", offset = target, depth = self.stack.len(), "undo");
        Some(record)
    }

    /// Step forward one record. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<BufferState> {
        let offset = self.offset?;
        let record = self.stack.get(offset + 1)?.state.clone();
        let target = (offset + 1).min(self.stack.len() - 1);
        self.offset = Some(target);
        trace!(target: "state.history", offset = target, depth = self.stack.len(), "redo");
        Some(record)
    }

    fn continues_word(last: &HistoryRecord, next: &BufferState, at: Instant) -> bool {
        if at.saturating_duration_since(last.at) >= HISTORY_TIME_GAP {
            return false;
        }
        let previous = trailing_word(last.state.value(), last.state.selection_start());
        let current = trailing_word(next.value(), next.selection_start());
        match (previous, current) {
            (Some(prev), Some(cur)) => cur.starts_with(prev),
            _ => false,
        }
    }

    fn trim(&mut self) {
        let count = self.stack.len();
        if count <= HISTORY_LIMIT {
            return;
        }
        let extras = count - HISTORY_LIMIT;
        self.stack.drain(..extras);
        self.offset = self.offset.map(|o| o.saturating_sub(extras));
        trace!(target: "state.history", evicted = extras, depth = self.stack.len(), "history_trimmed");
    }
}
