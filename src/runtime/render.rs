//! Prompt line rendering.

use crate::core::key::Arrow;
use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::width::WidthPolicy;

/// Queues redraw commands for the single prompt line. Reads prompt and buffer
/// contents but owns neither.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRenderer {
    width: WidthPolicy,
}

impl LineRenderer {
    pub fn new(width: WidthPolicy) -> Self {
        Self { width }
    }

    /// 1-based column just past the end of the input.
    pub fn cursor_column(&self, prompt: &[u8], buffer: &[u8]) -> usize {
        self.width.measure(prompt) + self.width.measure(buffer) + 1
    }

    pub fn clear_line(&self, out: &mut OutputGate) {
        out.push(TerminalCmd::ClearLine);
    }

    pub fn redraw(&self, out: &mut OutputGate, prompt: &[u8], buffer: &[u8]) {
        self.clear_line(out);
        out.push(TerminalCmd::bytes(prompt));
        if !buffer.is_empty() {
            out.push(TerminalCmd::bytes(buffer));
        }
        out.push(TerminalCmd::CursorToColumn(self.cursor_column(prompt, buffer)));
    }

    pub fn echo_byte(&self, out: &mut OutputGate, byte: u8) {
        out.push(TerminalCmd::Byte(byte));
    }

    pub fn erase_previous(&self, out: &mut OutputGate) {
        out.push(TerminalCmd::ErasePrevious);
    }

    /// Visual-only cursor move; the logical insertion point stays at the end.
    pub fn echo_arrow(&self, out: &mut OutputGate, arrow: Arrow) {
        out.push(TerminalCmd::EchoArrow(arrow));
    }
}

#[cfg(test)]
mod tests {
    use super::LineRenderer;
    use crate::core::output::OutputGate;
    use crate::core::width::WidthPolicy;

    #[test]
    fn redraw_clears_writes_and_places_cursor_after_input() {
        let renderer = LineRenderer::default();
        let mut out = OutputGate::new();
        renderer.redraw(&mut out, b"> ", b"ls");
        assert_eq!(out.encode(), b"\x1b[2K\r> ls\x1b[5G".to_vec());
    }

    #[test]
    fn cursor_math_counts_characters_not_bytes() {
        let renderer = LineRenderer::default();
        // "héllo" is 6 bytes, 5 characters.
        assert_eq!(renderer.cursor_column(b"> ", "héllo".as_bytes()), 8);
        assert_eq!(renderer.cursor_column("λ ".as_bytes(), b""), 3);
    }

    #[test]
    fn column_policy_counts_wide_characters() {
        let renderer = LineRenderer::new(WidthPolicy::Columns);
        assert_eq!(renderer.cursor_column(b"> ", "日本".as_bytes()), 7);
    }

    #[test]
    fn empty_prompt_and_buffer_park_cursor_in_first_column() {
        let renderer = LineRenderer::default();
        let mut out = OutputGate::new();
        renderer.redraw(&mut out, b"", b"");
        assert_eq!(out.encode(), b"\x1b[2K\r\x1b[1G".to_vec());
    }
}
