//! Edit command engine and the `EditSession` façade hosts talk to.
//!
//! Flow for a key event:
//! 1. The host hands over its current `BufferState` plus a `KeyEvent`.
//! 2. `key_translator::translate_key` maps it to an `Action` (or `None`, in
//!    which case the host's default behavior proceeds).
//! 3. `dispatcher::dispatch` applies the action: pure transforms in
//!    `dispatcher::{indent, edit}` compute the next state, which is recorded
//!    in `EditHistory` and returned in a `DispatchResult`.
//!
//! Plain text changes, composition boundaries and explicit undo/redo go
//! through the corresponding `EditSession` methods directly.

pub mod dispatcher;
pub mod key_translator;
pub mod session;

pub use dispatcher::DispatchResult;
pub use key_translator::{KeyContext, translate_key};
pub use session::EditSession;

/// Engine command resolved from a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    IndentLines,
    OutdentLines,
    InsertTab,
    DeleteIndent,
    WrapSelection(char),
    Undo,
    Redo,
    SnapshotBeforeMotion,
    /// Tab consumed with no edit (`ignore_tab_key`).
    SwallowTab,
    Blur,
}
