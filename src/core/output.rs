//! Typed terminal output commands and a single output gate.
//!
//! Invariant: the editor only writes to its terminal through
//! `OutputGate::flush(..)`.

use std::io;

use crate::core::key::{Arrow, ESC};
use crate::core::terminal::Terminal;

pub const CLEAR_LINE: &str = "\x1b[2K\r";
pub const ERASE_PREVIOUS: &str = "\x1b[D\x1b[0K";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Raw bytes written as-is (prompt, buffer contents, echoed input).
    Bytes(Vec<u8>),
    /// A single echoed input byte.
    Byte(u8),
    /// Erase the whole line and return to column 0.
    ClearLine,
    /// Move left one column and erase to end of line.
    ErasePrevious,
    /// Absolute cursor column, 1-based.
    CursorToColumn(usize),
    /// Re-emit an arrow escape sequence (visual cursor move only).
    EchoArrow(Arrow),
}

impl TerminalCmd {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Self::Bytes(data) => out.extend_from_slice(data),
            Self::Byte(byte) => out.push(*byte),
            Self::ClearLine => out.extend_from_slice(CLEAR_LINE.as_bytes()),
            Self::ErasePrevious => out.extend_from_slice(ERASE_PREVIOUS.as_bytes()),
            Self::CursorToColumn(column) => {
                out.extend_from_slice(format!("\x1b[{}G", (*column).max(1)).as_bytes());
            }
            Self::EchoArrow(arrow) => out.extend_from_slice(&[ESC, b'[', arrow.final_byte()]),
        }
    }
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = TerminalCmd>,
    {
        self.cmds.extend(cmds);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Encodes the pending commands without consuming them.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for cmd in &self.cmds {
            cmd.encode_into(&mut out);
        }
        out
    }

    /// Writes buffered commands to the terminal in one write.
    ///
    /// Pending commands are dropped even when the write fails; a half-drawn
    /// line is repaired by the next redraw.
    pub fn flush<T: Terminal + ?Sized>(&mut self, term: &mut T) -> io::Result<()> {
        if self.cmds.is_empty() {
            return Ok(());
        }
        let bytes = self.encode();
        self.cmds.clear();
        term.write(&bytes)
    }
}
