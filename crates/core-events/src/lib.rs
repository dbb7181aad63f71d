//! Key event types consumed by the edit engine.
//!
//! The host translates its native keyboard events into `KeyEvent` before
//! handing them to the session. Only the keys the engine reacts to get named
//! variants; everything printable arrives as `KeyCode::Char`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Tab,
    Backspace,
    Delete,
    Enter,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

impl KeyCode {
    /// Caret/viewport movement keys whose default action the host performs.
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            KeyCode::Up
                | KeyCode::Down
                | KeyCode::Left
                | KeyCode::Right
                | KeyCode::Home
                | KeyCode::End
                | KeyCode::PageUp
                | KeyCode::PageDown
        )
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
        const META = 0b0000_1000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn ctrl(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }

    pub fn alt(&self) -> bool {
        self.mods.contains(KeyModifiers::ALT)
    }

    pub fn shift(&self) -> bool {
        self.mods.contains(KeyModifiers::SHIFT)
    }

    pub fn meta(&self) -> bool {
        self.mods.contains(KeyModifiers::META)
    }

    /// Character key compared case-insensitively (hosts report `Z` for shift+z).
    pub fn is_char_ignore_case(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (KeyModifiers::CTRL, "ctrl"),
            (KeyModifiers::ALT, "alt"),
            (KeyModifiers::SHIFT, "shift"),
            (KeyModifiers::META, "meta"),
        ] {
            if self.mods.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{c}"),
            other => write!(f, "{}", named_key(other)),
        }
    }
}

fn named_key(code: KeyCode) -> &'static str {
    match code {
        KeyCode::Tab => "tab",
        KeyCode::Backspace => "backspace",
        KeyCode::Delete => "delete",
        KeyCode::Enter => "enter",
        KeyCode::Esc => "esc",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Char(_) => "char",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseKeyError {
    #[error("empty key chord")]
    Empty,
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
}

/// Parses chords such as `tab`, `shift+tab`, `ctrl+z`, `meta+shift+z`, `` ` ``.
///
/// The final `+`-separated segment is the key; a lone `+` is the plus character.
impl FromStr for KeyEvent {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseKeyError::Empty);
        }
        let (prefix, key) = match s.rsplit_once('+') {
            Some((p, "")) => (p.strip_suffix('+').unwrap_or(p), "+"),
            Some((p, k)) => (p, k),
            None => ("", s),
        };
        let mut mods = KeyModifiers::empty();
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            mods |= match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CTRL,
                "alt" | "option" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                "meta" | "cmd" | "super" => KeyModifiers::META,
                _ => return Err(ParseKeyError::UnknownModifier(part.to_string())),
            };
        }
        let mut chars = key.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => match key.to_ascii_lowercase().as_str() {
                "tab" => KeyCode::Tab,
                "backspace" | "bs" => KeyCode::Backspace,
                "delete" | "del" => KeyCode::Delete,
                "enter" | "return" => KeyCode::Enter,
                "esc" | "escape" => KeyCode::Esc,
                "up" | "arrowup" => KeyCode::Up,
                "down" | "arrowdown" => KeyCode::Down,
                "left" | "arrowleft" => KeyCode::Left,
                "right" | "arrowright" => KeyCode::Right,
                "home" => KeyCode::Home,
                "end" => KeyCode::End,
                "pageup" => KeyCode::PageUp,
                "pagedown" => KeyCode::PageDown,
                "space" => KeyCode::Char(' '),
                _ => return Err(ParseKeyError::UnknownKey(key.to_string())),
            },
        };
        Ok(KeyEvent { code, mods })
    }
}
