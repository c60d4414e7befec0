//! Line editing session: raw mode, prompt, history and the read loop.
//!
//! One [`Editor`] owns every piece of editing state for a terminal. Raw mode
//! lasts exactly as long as the editor: it is entered by `setup` and
//! restored when the editor is dropped (or explicitly released).

use crate::config::{EditorConfig, UnknownEscape};
use crate::core::history::{History, Navigation};
use crate::core::key::{decode_key, Arrow, Key};
use crate::core::line_buffer::{LineBuffer, MIN_CAPACITY};
use crate::core::output::OutputGate;
use crate::core::terminal::{Terminal, TerminalGuard};
use crate::error::{default_fatal_handler, FatalHandler, LineError};
use crate::platform::process_terminal::ProcessTerminal;
use crate::runtime::render::LineRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Done,
}

pub struct Editor<T: Terminal = ProcessTerminal> {
    terminal: TerminalGuard<T>,
    prompt: Vec<u8>,
    buffer: LineBuffer,
    history: History,
    renderer: LineRenderer,
    output: OutputGate,
    unknown_escape: UnknownEscape,
    fatal: FatalHandler,
}

impl Editor<ProcessTerminal> {
    /// Takes over the process terminal using `RAWLINE_*` configuration.
    ///
    /// Call once per process. Failure to control the terminal is fatal.
    pub fn setup() -> Self {
        Self::setup_with(ProcessTerminal::new(), EditorConfig::from_env())
    }
}

impl<T: Terminal> Editor<T> {
    /// Enters raw mode on `terminal` and draws the prompt.
    pub fn try_setup_with(mut terminal: T, config: EditorConfig) -> Result<Self, LineError> {
        terminal.set_read_timeout_deciseconds(config.read_timeout_deciseconds);
        let terminal = TerminalGuard::acquire(terminal)
            .map_err(|(_, source)| LineError::attributes("entering raw mode", source))?;
        let mut editor = Self {
            terminal,
            prompt: config.prompt.into_bytes(),
            buffer: LineBuffer::new(),
            history: History::new(config.history_capacity),
            renderer: LineRenderer::new(config.width_policy),
            output: OutputGate::new(),
            unknown_escape: config.unknown_escape,
            fatal: default_fatal_handler,
        };
        editor.redraw()?;
        Ok(editor)
    }

    /// Like [`Editor::try_setup_with`], reporting failure through the default
    /// fatal handler.
    pub fn setup_with(terminal: T, config: EditorConfig) -> Self {
        match Self::try_setup_with(terminal, config) {
            Ok(editor) => editor,
            Err(err) => default_fatal_handler(&err),
        }
    }

    /// Replaces the handler used when the terminal fails mid-session.
    pub fn set_fatal_handler(&mut self, handler: FatalHandler) {
        self.fatal = handler;
    }

    pub fn prompt(&self) -> &[u8] {
        &self.prompt
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Line being edited; empty between calls.
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn terminal(&self) -> &T {
        self.terminal.terminal()
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        self.terminal.terminal_mut()
    }

    pub fn try_set_prompt(&mut self, prompt: impl Into<Vec<u8>>) -> Result<(), LineError> {
        self.prompt = prompt.into();
        self.redraw()
    }

    /// Replaces the prompt and redraws the line immediately.
    pub fn set_prompt(&mut self, prompt: impl Into<Vec<u8>>) {
        if let Err(err) = self.try_set_prompt(prompt) {
            self.fail(err);
        }
    }

    /// Blocks until Enter and returns the line. Terminal failures go to the
    /// fatal handler.
    pub fn read_line(&mut self) -> String {
        match self.try_read_line() {
            Ok(line) => line,
            Err(err) => self.fail(err),
        }
    }

    /// Blocks until Enter and returns the line, without the newline.
    ///
    /// Every call returns a fresh `String`; nothing is shared with the
    /// editor's own buffer.
    pub fn try_read_line(&mut self) -> Result<String, LineError> {
        self.buffer.reset();
        self.buffer.ensure_capacity(MIN_CAPACITY);
        self.history.reset_selection();
        self.redraw()?;

        loop {
            let terminal = self.terminal.terminal_mut();
            let byte = match terminal.read_byte().map_err(LineError::Read)? {
                Some(0) | None => continue,
                Some(byte) => byte,
            };
            if self.buffer.is_nearly_full() {
                self.buffer.grow();
            }
            let key = decode_key(byte, || terminal.read_byte()).map_err(LineError::Read)?;
            if self.handle_key(key)? == Step::Done {
                break;
            }
        }

        self.finish()
    }

    /// Restores the terminal now and hands it back.
    pub fn release(self) -> Result<T, LineError> {
        self.terminal
            .release()
            .map_err(|source| LineError::attributes("restoring terminal mode", source))
    }

    fn handle_key(&mut self, key: Key) -> Result<Step, LineError> {
        match key {
            Key::Enter => return Ok(Step::Done),
            Key::Backspace => {
                self.history.reset_selection();
                if self.buffer.delete_last() {
                    self.renderer.erase_previous(&mut self.output);
                }
            }
            Key::Byte(byte) => {
                self.history.reset_selection();
                self.buffer.append_byte(byte);
                self.renderer.echo_byte(&mut self.output, byte);
            }
            Key::Arrow(arrow @ (Arrow::Up | Arrow::Down)) => self.navigate(arrow),
            Key::Arrow(arrow) => self.renderer.echo_arrow(&mut self.output, arrow),
            Key::UnknownEscape(second) => match self.unknown_escape {
                UnknownEscape::Submit => return Ok(Step::Done),
                UnknownEscape::Ignore => tracing::trace!(?second, "ignoring escape sequence"),
            },
            Key::UnknownCsi(last) => tracing::trace!(?last, "ignoring CSI sequence"),
        }
        self.flush()?;
        Ok(Step::Continue)
    }

    fn navigate(&mut self, arrow: Arrow) {
        let navigation = if arrow == Arrow::Up {
            self.history.navigate_up()
        } else {
            self.history.navigate_down()
        };
        match navigation {
            Navigation::Entry(entry) => self.buffer.set_from(entry),
            Navigation::Live => self.buffer.set_from(&[]),
            Navigation::Unchanged => return,
        }
        self.renderer
            .redraw(&mut self.output, &self.prompt, self.buffer.as_bytes());
    }

    fn finish(&mut self) -> Result<String, LineError> {
        let line = self.buffer.to_string_lossy();
        let saved = self.history.save(self.buffer.as_bytes());
        self.buffer.reset();
        tracing::debug!(bytes = line.len(), saved, "line submitted");
        self.renderer.clear_line(&mut self.output);
        self.flush()?;
        Ok(line)
    }

    fn redraw(&mut self) -> Result<(), LineError> {
        self.renderer
            .redraw(&mut self.output, &self.prompt, self.buffer.as_bytes());
        self.flush()
    }

    fn flush(&mut self) -> Result<(), LineError> {
        self.output
            .flush(self.terminal.terminal_mut())
            .map_err(LineError::Write)
    }

    fn fail(&mut self, err: LineError) -> ! {
        if let Err(restore) = self.terminal.terminal_mut().stop() {
            tracing::warn!(error = %restore, "failed to restore terminal before fatal error");
        }
        (self.fatal)(&err)
    }
}

impl<T: Terminal + std::fmt::Debug> std::fmt::Debug for Editor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("terminal", &self.terminal)
            .field("prompt", &String::from_utf8_lossy(&self.prompt))
            .field("buffer_len", &self.buffer.len())
            .field("history_len", &self.history.len())
            .finish()
    }
}
