//! Core editing types: terminal interface, line buffer, history, key decoding.

pub mod history;
pub mod key;
pub mod line_buffer;
pub mod output;
pub mod terminal;
pub mod width;
