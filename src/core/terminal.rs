//! Terminal trait and the guard that restores it.

use std::io;

/// Byte-oriented terminal the editor drives.
pub trait Terminal {
    /// Capture the current mode (first call only) and switch to raw input.
    fn start(&mut self) -> io::Result<()>;

    /// Restore the mode captured by `start`.
    fn stop(&mut self) -> io::Result<()>;

    /// Read one byte, waiting at most the configured timeout. `Ok(None)` means
    /// the wait elapsed without input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Write bytes, unbuffered.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// How long `read_byte` waits for input. Applied by the next `start`;
    /// terminals without a timeout ignore it.
    fn set_read_timeout_deciseconds(&mut self, _deciseconds: u8) {}
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn start(&mut self) -> io::Result<()> {
        (**self).start()
    }

    fn stop(&mut self) -> io::Result<()> {
        (**self).stop()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write(data)
    }

    fn set_read_timeout_deciseconds(&mut self, deciseconds: u8) {
        (**self).set_read_timeout_deciseconds(deciseconds)
    }
}

/// RAII guard that stops the terminal on drop.
///
/// Holding the guard means raw mode is active; dropping it on any path
/// (return, `?`, unwind) restores the captured mode.
pub struct TerminalGuard<T: Terminal> {
    terminal: Option<T>,
}

impl<T: Terminal> TerminalGuard<T> {
    /// Starts `terminal`; on failure the terminal is handed back untouched.
    pub fn acquire(mut terminal: T) -> Result<Self, (T, io::Error)> {
        match terminal.start() {
            Ok(()) => {
                tracing::info!("terminal raw mode enabled");
                Ok(Self {
                    terminal: Some(terminal),
                })
            }
            Err(err) => Err((terminal, err)),
        }
    }

    pub fn terminal(&self) -> &T {
        self.terminal
            .as_ref()
            .expect("terminal already taken from guard")
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        self.terminal
            .as_mut()
            .expect("terminal already taken from guard")
    }

    /// Restores the terminal now and returns it.
    pub fn release(mut self) -> io::Result<T> {
        let mut terminal = self
            .terminal
            .take()
            .expect("terminal already taken from guard");
        terminal.stop()?;
        tracing::info!("terminal raw mode disabled");
        Ok(terminal)
    }
}

impl<T: Terminal> Drop for TerminalGuard<T> {
    fn drop(&mut self) {
        if let Some(terminal) = self.terminal.as_mut() {
            match terminal.stop() {
                Ok(()) => tracing::info!("terminal raw mode disabled"),
                Err(err) => tracing::warn!(error = %err, "failed to restore terminal mode"),
            }
        }
    }
}

impl<T: Terminal + std::fmt::Debug> std::fmt::Debug for TerminalGuard<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalGuard")
            .field("terminal", &self.terminal)
            .finish()
    }
}
