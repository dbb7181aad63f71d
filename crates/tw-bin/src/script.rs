//! Replay scripts: host events driven through an `EditSession` over a manual
//! clock, with a minimal textarea standing in for the host surface.
//!
//! ```text
//! # comment
//! select 0 5
//! key shift+tab
//! type hello world
//! compose か
//! wait 3500
//! undo
//! redo
//! ```
//!
//! `type` and `compose` take the rest of the line verbatim after one space;
//! `\n`, `\t` and `\\` are unescaped. Keys the engine lets through get the
//! textarea's default behavior (insert, delete, caret movement) and plain
//! edits are reported back as text changes.

use anyhow::{Context, Result, anyhow, bail};
use core_actions::{DispatchResult, EditSession};
use core_config::EditSettings;
use core_events::{KeyCode, KeyEvent};
use core_state::ManualClock;
use core_text::{BufferState, BufferStateError, grapheme, line_start};
use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(usize, usize),
    Key(KeyEvent),
    Type(String),
    Compose(String),
    Wait(u64),
    Undo,
    Redo,
}

/// A command with the 1-based script line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub line: usize,
    pub command: Command,
}

pub fn parse_script(src: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim_start();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let command = parse_command(text).with_context(|| format!("script line {line}"))?;
        steps.push(Step { line, command });
    }
    Ok(steps)
}

fn parse_command(text: &str) -> Result<Command> {
    let (word, rest) = text.split_once(' ').unwrap_or((text, ""));
    let command = match word {
        "select" => {
            let mut parts = rest.split_whitespace();
            let start = parse_offset(parts.next())?;
            let end = parse_offset(parts.next())?;
            if parts.next().is_some() {
                bail!("select takes two offsets");
            }
            Command::Select(start, end)
        }
        "key" => {
            let chord = rest.trim();
            let key = chord
                .parse()
                .with_context(|| format!("bad key chord `{chord}`"))?;
            Command::Key(key)
        }
        "type" => Command::Type(unescape(rest)?),
        "compose" => Command::Compose(unescape(rest)?),
        "wait" => {
            let ms = rest.trim();
            Command::Wait(ms.parse().with_context(|| format!("bad duration `{ms}`"))?)
        }
        "undo" | "redo" if !rest.trim().is_empty() => bail!("`{word}` takes no arguments"),
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        other => bail!("unknown command `{other}`"),
    };
    Ok(command)
}

fn parse_offset(part: Option<&str>) -> Result<usize> {
    let part = part.ok_or_else(|| anyhow!("select takes two offsets"))?;
    part.parse()
        .with_context(|| format!("bad offset `{part}`"))
}

fn unescape(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => bail!("unknown escape `\\{other}`"),
            None => bail!("dangling backslash"),
        }
    }
    Ok(out)
}

/// What the textarea does on its own with a key the engine did not consume.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HostEffect {
    /// Text changed; reported to the session as a text change.
    Edit(BufferState),
    /// Only the caret moved.
    Move(BufferState),
    /// Focus leaves the textarea.
    FocusOut,
    None,
}

fn splice(value: &str, start: usize, end: usize, text: &str) -> Result<BufferState, BufferStateError> {
    let mut next = String::with_capacity(value.len() + text.len());
    next.push_str(&value[..start]);
    next.push_str(text);
    next.push_str(&value[end..]);
    BufferState::caret(next, start + text.len())
}

fn replace_selection(state: &BufferState, text: &str) -> Result<BufferState, BufferStateError> {
    splice(
        state.value(),
        state.selection_start(),
        state.selection_end(),
        text,
    )
}

fn floor_char_boundary(value: &str, mut at: usize) -> usize {
    while !value.is_char_boundary(at) {
        at -= 1;
    }
    at
}

fn line_end(value: &str, at: usize) -> usize {
    value[at..].find('\n').map_or(value.len(), |i| at + i)
}

/// Same byte column on the line above, clamped to its length.
fn caret_up(value: &str, at: usize) -> usize {
    let start = line_start(value, at);
    if start == 0 {
        return 0;
    }
    let column = at - start;
    let prev_start = line_start(value, start - 1);
    let target = prev_start + column.min(start - 1 - prev_start);
    floor_char_boundary(value, target)
}

fn caret_down(value: &str, at: usize) -> usize {
    let end = line_end(value, at);
    if end == value.len() {
        return value.len();
    }
    let column = at - line_start(value, at);
    let next_start = end + 1;
    let next_end = line_end(value, next_start);
    let target = next_start + column.min(next_end - next_start);
    floor_char_boundary(value, target)
}

fn host_default(state: &BufferState, key: &KeyEvent) -> Result<HostEffect, BufferStateError> {
    let value = state.value();
    let (start, end) = (state.selection_start(), state.selection_end());
    let command_mods = key.ctrl() || key.alt() || key.meta();
    let moved = |at: usize| BufferState::caret(value, at).map(HostEffect::Move);
    let effect = match key.code {
        KeyCode::Char(c) if !command_mods => {
            let mut buf = [0u8; 4];
            HostEffect::Edit(replace_selection(state, c.encode_utf8(&mut buf))?)
        }
        KeyCode::Enter if !command_mods => HostEffect::Edit(replace_selection(state, "\n")?),
        KeyCode::Backspace | KeyCode::Delete => {
            let (from, to) = if state.has_selection() {
                (start, end)
            } else if key.code == KeyCode::Backspace {
                (grapheme::prev_boundary(value, start), start)
            } else {
                (start, grapheme::next_boundary(value, start))
            };
            if from == to {
                HostEffect::None
            } else {
                HostEffect::Edit(splice(value, from, to, "")?)
            }
        }
        KeyCode::Left if state.has_selection() => moved(start)?,
        KeyCode::Right if state.has_selection() => moved(end)?,
        KeyCode::Left => moved(grapheme::prev_boundary(value, start))?,
        KeyCode::Right => moved(grapheme::next_boundary(value, end))?,
        KeyCode::Home => moved(line_start(value, start))?,
        KeyCode::End => moved(line_end(value, end))?,
        KeyCode::Up => moved(caret_up(value, start))?,
        KeyCode::Down => moved(caret_down(value, end))?,
        KeyCode::PageUp => moved(0)?,
        KeyCode::PageDown => moved(value.len())?,
        KeyCode::Tab => HostEffect::FocusOut,
        _ => HostEffect::None,
    };
    Ok(effect)
}

/// Host surface plus the session it drives.
pub struct Replay {
    session: EditSession,
    clock: ManualClock,
    surface: BufferState,
    blurred: bool,
}

impl Replay {
    pub fn new(initial: BufferState, settings: EditSettings) -> Self {
        let clock = ManualClock::new();
        let session = EditSession::with_clock(initial.clone(), settings, clock.clone());
        Self {
            session,
            clock,
            surface: initial,
            blurred: false,
        }
    }

    pub fn surface(&self) -> &BufferState {
        &self.surface
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Focus left the textarea at some point (Esc, or Tab let through).
    pub fn blurred(&self) -> bool {
        self.blurred
    }

    pub fn run(&mut self, steps: &[Step]) -> Result<()> {
        for step in steps {
            self.apply(&step.command)
                .with_context(|| format!("script line {}", step.line))?;
        }
        info!(
            target: "runtime",
            steps = steps.len(),
            depth = self.session.history().len(),
            "replay_complete"
        );
        Ok(())
    }

    pub fn apply(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Select(start, end) => {
                self.surface = self.surface.with_selection(*start, *end)?;
            }
            Command::Key(key) => self.press(key)?,
            Command::Type(text) => {
                for c in text.chars() {
                    let code = match c {
                        '\n' => KeyCode::Enter,
                        '\t' => KeyCode::Tab,
                        c => KeyCode::Char(c),
                    };
                    self.press(&KeyEvent::plain(code))?;
                }
            }
            Command::Compose(text) => self.compose(text)?,
            Command::Wait(ms) => self.clock.advance(Duration::from_millis(*ms)),
            Command::Undo => {
                if let Some(state) = self.session.undo() {
                    self.surface = state;
                }
            }
            Command::Redo => {
                if let Some(state) = self.session.redo() {
                    self.surface = state;
                }
            }
        }
        Ok(())
    }

    fn press(&mut self, key: &KeyEvent) -> Result<()> {
        let result = self.session.apply_key_event(self.surface.clone(), key)?;
        debug!(
            target: "runtime",
            %key,
            prevent_default = result.prevent_default,
            changed = result.changed(),
            blur = result.blur,
            "key_result"
        );
        self.settle(key, result)
    }

    fn settle(&mut self, key: &KeyEvent, result: DispatchResult) -> Result<()> {
        if result.blur {
            self.blurred = true;
        }
        if let Some(state) = result.state {
            self.surface = state;
            return Ok(());
        }
        if result.prevent_default || result.blur {
            return Ok(());
        }
        match host_default(&self.surface, key)? {
            HostEffect::Edit(next) => {
                self.surface = self.session.apply_text_change(next).clone();
            }
            HostEffect::Move(next) => self.surface = next,
            HostEffect::FocusOut => self.blurred = true,
            HostEffect::None => {}
        }
        Ok(())
    }

    /// Feed `text` as an IME composition growing one character at a time.
    fn compose(&mut self, text: &str) -> Result<()> {
        let base = self.surface.clone();
        self.session.notify_composition_start();
        for (idx, c) in text.char_indices() {
            let partial = replace_selection(&base, &text[..idx + c.len_utf8()])?;
            self.surface = self.session.apply_text_change(partial).clone();
        }
        let committed = replace_selection(&base, text)?;
        self.surface = self.session.notify_composition_end(committed).clone();
        Ok(())
    }

    /// Selection, focus and (optionally) the history stack, one item per line.
    pub fn summary(&self, with_history: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "selection {} {}",
            self.surface.selection_start(),
            self.surface.selection_end()
        );
        if self.blurred {
            let _ = writeln!(out, "blurred");
        }
        if with_history {
            let history = self.session.history();
            let offset = history.offset();
            let _ = writeln!(
                out,
                "history {}/{}",
                offset.map_or(0, |o| o + 1),
                history.len()
            );
            for (idx, record) in history.records().iter().enumerate() {
                let marker = if Some(idx) == offset { '*' } else { ' ' };
                let _ = writeln!(
                    out,
                    "{marker} {idx:>3} {}..{} {:?}",
                    record.state.selection_start(),
                    record.state.selection_end(),
                    record.state.value()
                );
            }
        }
        out
    }
}
