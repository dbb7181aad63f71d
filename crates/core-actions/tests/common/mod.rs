#![allow(dead_code)] // Shared across many integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, EditSession};
use core_config::{EditSettings, PlatformFamily};
use core_events::KeyEvent;
use core_state::ManualClock;
use core_text::BufferState;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

pub fn settings() -> EditSettings {
    EditSettings::new(2, true, false).with_platform(PlatformFamily::Other)
}

pub fn sel(value: &str, start: usize, end: usize) -> BufferState {
    BufferState::new(value, start, end).unwrap()
}

pub fn caret(value: &str, at: usize) -> BufferState {
    BufferState::caret(value, at).unwrap()
}

pub fn caret_end(value: &str) -> BufferState {
    BufferState::caret(value, value.len()).unwrap()
}

pub fn key(chord: &str) -> KeyEvent {
    chord.parse().unwrap()
}

/// Session over a manual clock the test advances explicitly.
pub struct Harness {
    pub session: EditSession,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new(initial: BufferState) -> Self {
        Self::with_settings(initial, settings())
    }

    pub fn with_settings(initial: BufferState, settings: EditSettings) -> Self {
        let clock = ManualClock::new();
        let session = EditSession::with_clock(initial, settings, clock.clone());
        Self { session, clock }
    }

    /// Press `chord` against the session's current buffer.
    pub fn press(&mut self, chord: &str) -> DispatchResult {
        let state = self.session.buffer().clone();
        self.session.apply_key_event(state, &key(chord)).unwrap()
    }

    /// Press `chord` against an explicit host state.
    pub fn press_on(&mut self, state: BufferState, chord: &str) -> DispatchResult {
        self.session.apply_key_event(state, &key(chord)).unwrap()
    }

    /// Host-side typing: replace the selection with `text`, caret after it, then report the change.
    pub fn type_char(&mut self, c: char) -> BufferState {
        let cur = self.session.buffer().clone();
        let mut value = String::new();
        value.push_str(&cur.value()[..cur.selection_start()]);
        value.push(c);
        value.push_str(&cur.value()[cur.selection_end()..]);
        let at = cur.selection_start() + c.len_utf8();
        self.session.apply_text_change(caret(&value, at)).clone()
    }

    pub fn type_str(&mut self, text: &str, gap_ms: u64) {
        for c in text.chars() {
            self.wait(gap_ms);
            self.type_char(c);
        }
    }

    pub fn wait(&self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
    }

    pub fn value(&self) -> &str {
        self.session.buffer().value()
    }

    pub fn selection(&self) -> (usize, usize) {
        let b = self.session.buffer();
        (b.selection_start(), b.selection_end())
    }

    pub fn depth(&self) -> usize {
        self.session.history().len()
    }
}

#[derive(Clone)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

/// Run `f` under a TRACE-level fmt subscriber and return everything it logged.
pub fn capture_logs<F: FnOnce()>(f: F) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = BufferWriter {
        inner: buffer.clone(),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
        .finish();
    with_default(subscriber, f);
    let bytes = buffer.lock().expect("log buffer poisoned").clone();
    String::from_utf8(bytes).expect("logs are utf-8")
}
