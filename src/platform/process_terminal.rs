//! Process terminal: stdin/stdout file descriptors in line-less raw mode.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, OnceLock, TryLockError,
};
use std::thread::{self, JoinHandle};

use crate::config::{EditorConfig, EnvConfig};
use crate::core::terminal::Terminal;

#[cfg(unix)]
use libc::{self, c_int};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Signals that restore the terminal and terminate the process.
#[cfg(unix)]
const TERMINATION_SIGNALS: [c_int; 4] = [libc::SIGINT, libc::SIGTERM, libc::SIGHUP, libc::SIGQUIT];

#[cfg(unix)]
fn wait_writable(fd: c_int) -> io::Result<()> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLOUT,
        revents: 0,
    };
    loop {
        let result = unsafe { libc::poll(&mut fds, 1, -1) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result == 0 {
            continue;
        }
        if (fds.revents & libc::POLLOUT) != 0 {
            return Ok(());
        }

        return Err(io::Error::other(format!(
            "poll(POLLOUT) returned revents=0x{:x}",
            fds.revents
        )));
    }
}

#[cfg(unix)]
fn write_all_fd_with<FWrite, FWait>(
    fd: c_int,
    bytes: &[u8],
    mut write_once: FWrite,
    mut wait_writable: FWait,
) -> io::Result<()>
where
    FWrite: FnMut(c_int, &[u8]) -> io::Result<usize>,
    FWait: FnMut(c_int) -> io::Result<()>,
{
    let mut written = 0;
    while written < bytes.len() {
        match write_once(fd, &bytes[written..]) {
            Ok(0) => {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "write returned 0"));
            }
            Ok(count) => {
                let remaining = bytes.len() - written;
                if count > remaining {
                    return Err(io::Error::other("write returned more bytes than requested"));
                }
                written += count;
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => wait_writable(fd)?,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

#[cfg(unix)]
fn write_fd(fd: c_int, bytes: &[u8]) -> io::Result<()> {
    if bytes.is_empty() {
        return Ok(());
    }
    write_all_fd_with(
        fd,
        bytes,
        |fd, buf| {
            let result = unsafe { libc::write(fd, buf.as_ptr().cast::<libc::c_void>(), buf.len()) };
            if result < 0 {
                Err(io::Error::last_os_error())
            } else {
                Ok(result as usize)
            }
        },
        wait_writable,
    )
}

#[cfg(unix)]
fn read_one(fd: c_int) -> io::Result<Option<u8>> {
    let mut byte = 0u8;
    let result = unsafe { libc::read(fd, (&mut byte as *mut u8).cast::<libc::c_void>(), 1) };
    match result {
        1 => Ok(Some(byte)),
        0 => Ok(None),
        _ => {
            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(None),
                _ => Err(err),
            }
        }
    }
}

#[cfg(unix)]
fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// No echo, no canonical line buffering; reads return after one byte or
/// `timeout_deciseconds` without input.
#[cfg(unix)]
fn line_mode_termios(original: &libc::termios, timeout_deciseconds: u8) -> libc::termios {
    let mut raw = *original;
    raw.c_lflag &= !(libc::ECHO | libc::ICANON);
    raw.c_cc[libc::VMIN] = 0;
    raw.c_cc[libc::VTIME] = timeout_deciseconds as libc::cc_t;
    raw
}

/// Cleanup hooks held for as long as raw mode is active.
#[cfg(unix)]
struct ExitHooks {
    _signals: SignalHookGuard,
    _panic: PanicHookGuard,
}

#[cfg(unix)]
pub struct ProcessTerminal {
    stdin_fd: c_int,
    stdout_fd: c_int,
    read_timeout_deciseconds: u8,
    original_termios: Option<libc::termios>,
    hooks: Option<ExitHooks>,
    write_log_path: Option<PathBuf>,
    write_log_failed: bool,
}

#[cfg(unix)]
impl ProcessTerminal {
    /// Terminal on the process's stdin/stdout; `RAWLINE_WRITE_LOG` enables
    /// the write log.
    pub fn new() -> Self {
        let env = EnvConfig::from_env();
        let mut terminal = Self::with_fds(libc::STDIN_FILENO, libc::STDOUT_FILENO);
        terminal.write_log_path = env.write_log.map(PathBuf::from);
        terminal
    }

    /// Terminal on arbitrary descriptors (a PTY slave, for instance).
    pub fn with_fds(stdin_fd: c_int, stdout_fd: c_int) -> Self {
        Self {
            stdin_fd,
            stdout_fd,
            read_timeout_deciseconds: EditorConfig::default().read_timeout_deciseconds,
            original_termios: None,
            hooks: None,
            write_log_path: None,
            write_log_failed: false,
        }
    }

    /// Append every written byte to `path` as well.
    pub fn set_write_log(&mut self, path: impl Into<PathBuf>) {
        self.write_log_path = Some(path.into());
        self.write_log_failed = false;
    }

    pub fn is_raw(&self) -> bool {
        self.hooks.is_some()
    }

    fn install_exit_hooks(&mut self, original: libc::termios) -> io::Result<()> {
        if self.hooks.is_some() {
            return Ok(());
        }
        let fd = self.stdin_fd;
        let signals = install_signal_handlers(move |signal| {
            tracing::warn!(signal, "termination signal received, restoring terminal");
            let _ = set_termios(fd, &original);
            std::process::exit(128 + signal);
        })?;
        let panic = install_panic_hook(move || {
            let _ = set_termios(fd, &original);
        });
        self.hooks = Some(ExitHooks {
            _signals: signals,
            _panic: panic,
        });
        Ok(())
    }

    fn append_write_log(&mut self, data: &[u8]) {
        if self.write_log_failed {
            return;
        }
        if let Some(path) = self.write_log_path.as_ref() {
            let result = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut file| file.write_all(data));
            if let Err(err) = result {
                tracing::warn!(error = %err, path = %path.display(), "disabling terminal write log");
                self.write_log_failed = true;
            }
        }
    }
}

#[cfg(unix)]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl std::fmt::Debug for ProcessTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessTerminal")
            .field("stdin_fd", &self.stdin_fd)
            .field("stdout_fd", &self.stdout_fd)
            .field("read_timeout_deciseconds", &self.read_timeout_deciseconds)
            .field("raw", &self.is_raw())
            .field("write_log_path", &self.write_log_path)
            .finish()
    }
}

#[cfg(unix)]
impl Terminal for ProcessTerminal {
    fn start(&mut self) -> io::Result<()> {
        // Only the first snapshot counts; a repeated start must not capture
        // raw mode as the "original".
        let original = match self.original_termios {
            Some(original) => original,
            None => {
                let original = get_termios(self.stdin_fd)?;
                self.original_termios = Some(original);
                original
            }
        };
        self.install_exit_hooks(original)?;
        let raw = line_mode_termios(&original, self.read_timeout_deciseconds);
        if let Err(err) = set_termios(self.stdin_fd, &raw) {
            self.hooks = None;
            return Err(err);
        }
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        let result = match self.original_termios.as_ref() {
            Some(original) => set_termios(self.stdin_fd, original),
            None => Ok(()),
        };
        self.hooks = None;
        result
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        read_one(self.stdin_fd)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        write_fd(self.stdout_fd, data)?;
        self.append_write_log(data);
        Ok(())
    }

    fn set_read_timeout_deciseconds(&mut self, deciseconds: u8) {
        self.read_timeout_deciseconds = deciseconds;
    }
}

/// Signal handler guard; dropping it unregisters the handlers.
#[cfg(unix)]
pub struct SignalHookGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

#[cfg(unix)]
impl Drop for SignalHookGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Install SIGINT/SIGTERM/SIGHUP/SIGQUIT cleanup. `cleanup` receives the signal
/// number and is expected to terminate the process.
#[cfg(unix)]
pub fn install_signal_handlers<F>(cleanup: F) -> io::Result<SignalHookGuard>
where
    F: Fn(c_int) + Send + 'static,
{
    let mut signals = Signals::new(TERMINATION_SIGNALS)?;
    let handle = signals.handle();

    let thread = thread::spawn(move || {
        for signal in signals.forever() {
            cleanup(signal);
        }
    });

    Ok(SignalHookGuard {
        handle,
        thread: Some(thread),
    })
}

type PanicCleanup = Arc<dyn Fn() + Send + Sync + 'static>;

/// Cleanups run by the process panic hook, keyed by guard id.
static PANIC_CLEANUPS: Mutex<Vec<(u64, PanicCleanup)>> = Mutex::new(Vec::new());
static NEXT_PANIC_CLEANUP_ID: AtomicU64 = AtomicU64::new(0);
static PANIC_HOOK: OnceLock<()> = OnceLock::new();

fn run_panic_cleanups() {
    // A panic while the registry is locked must not deadlock the hook.
    let cleanups = match PANIC_CLEANUPS.try_lock() {
        Ok(guard) => guard.clone(),
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().clone(),
        Err(TryLockError::WouldBlock) => return,
    };
    for (_, cleanup) in cleanups {
        cleanup();
    }
}

/// Panic hook guard; dropping it unregisters the cleanup.
#[derive(Debug)]
pub struct PanicHookGuard {
    id: u64,
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        let mut cleanups = match PANIC_CLEANUPS.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        cleanups.retain(|(id, _)| *id != self.id);
    }
}

/// Register `cleanup` to run before the previous panic hook reports a panic.
///
/// The wrapping hook is installed once per process and stays; guards only
/// add and remove their cleanup.
pub fn install_panic_hook<F>(cleanup: F) -> PanicHookGuard
where
    F: Fn() + Send + Sync + 'static,
{
    PANIC_HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            run_panic_cleanups();
            previous(info);
        }));
    });

    let id = NEXT_PANIC_CLEANUP_ID.fetch_add(1, Ordering::SeqCst);
    let mut cleanups = match PANIC_CLEANUPS.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    cleanups.push((id, Arc::new(cleanup)));
    PanicHookGuard { id }
}

#[cfg(not(unix))]
#[derive(Debug, Default)]
pub struct ProcessTerminal;

#[cfg(not(unix))]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(unix))]
impl Terminal for ProcessTerminal {
    fn start(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "ProcessTerminal is only supported on Unix platforms",
        ))
    }

    fn stop(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }

    fn write(&mut self, _data: &[u8]) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}
