//! Raw-mode line editor for terminal REPLs.
//!
//! Invariant: the terminal is in raw mode exactly while an [`Editor`] is alive.
//! Dropping the editor, unwinding through it, or a termination signal all
//! restore the mode captured at setup.
//!
//! # Public API Overview
//! - [`Editor::setup`] takes over the process terminal; [`Editor::read_line`]
//!   returns one line per call; [`Editor::set_prompt`] changes the prompt.
//! - `try_*` variants return [`LineError`] instead of invoking the fatal hook
//!   ([`FatalHandler`], replaceable with [`Editor::set_fatal_handler`]).
//! - [`Terminal`] abstracts the byte stream so the editor can run against a
//!   PTY or an in-memory script.
//! - [`History`], [`LineBuffer`] and [`display_width`] are usable on their own.

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod platform;
pub mod runtime;

/// Configuration types and defaults.
pub use crate::config::{EditorConfig, EnvConfig, UnknownEscape, DEFAULT_PROMPT};
/// Error type and the fatal-error hook.
pub use crate::error::{default_fatal_handler, FatalHandler, LineError};

/// Editing building blocks.
pub use crate::core::history::{History, Navigation, DEFAULT_HISTORY_CAPACITY};
pub use crate::core::key::{decode_key, Arrow, Key};
pub use crate::core::line_buffer::LineBuffer;
pub use crate::core::width::{column_width, display_width, WidthPolicy};

/// Terminal interface, restore guard and the process-backed implementation.
pub use crate::core::terminal::{Terminal, TerminalGuard};
pub use crate::platform::process_terminal::ProcessTerminal;

/// The editing session.
pub use crate::runtime::{Editor, LineRenderer};
