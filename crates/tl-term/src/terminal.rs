// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, alternate screen, and guaranteed restore.
//
// Safety: termios, ioctl, and isatty are the POSIX interfaces for
// terminal control and have no safe wrappers in std; each unsafe block
// below is a single syscall.
#![allow(unsafe_code)]
//
// typeline owns exactly one terminal for the life of the process, and
// that keeps the restore story small. The cooked termios state captured
// the first time raw mode is switched on is the state every exit path
// returns to, so it lives in a process-global `OnceLock` rather than on
// the handle: normal teardown, the `Drop` impl, and the panic hook all
// read the same cell, and none of them needs the `Terminal` value to do
// it.
//
// The panic path deserves a note. A panic in the middle of a frame
// write happens while the stdout lock is held, so the hook cannot go
// through `io::stdout()` without deadlocking — it writes the restore
// bytes straight to fd 1 with `write(2)` and resets termios from the
// saved cell. Then the previous hook runs and the panic message prints
// to a terminal that echoes again.

use std::io::{self, Write};
use std::sync::Once;
#[cfg(unix)]
use std::sync::OnceLock;

use crate::ansi;

/// Query the current terminal width in columns via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn width() -> Option<u16> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 {
        Some(ws.ws_col)
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn width() -> Option<u16> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Restore ────────────────────────────────────────────────────────────────

/// The cooked termios state from before the first switch to raw mode.
///
/// Written once by [`set_raw_mode`], read by [`unset_raw_mode`] and the
/// panic hook. First capture wins: with one terminal per process there
/// is exactly one state worth returning to.
#[cfg(unix)]
static SAVED_TERMIOS: OnceLock<libc::termios> = OnceLock::new();

/// Everything the screen needs to be usable again, in teardown order:
/// SGR reset, cursor visible, back to the primary screen, one newline
/// so the shell prompt starts on a clean line. Emitted while the
/// terminal may still be raw, hence the CRLF.
const RESTORE_BYTES: &[u8] = b"\x1b[0m\x1b[?25h\x1b[?1049l\r\n";

/// Guard so the panic hook is chained at most once per process.
static HOOK_ARMED: Once = Once::new();

/// Chain a panic hook that puts the terminal back before the panic
/// message prints. Without it, a panic in raw mode leaves the user
/// with no echo and no way to read the error.
fn arm_panic_hook() {
    HOOK_ARMED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            panic_restore();
            previous(info);
        }));
    });
}

/// Best-effort restore that is safe to run mid-panic: one raw
/// `write(2)` of [`RESTORE_BYTES`] to fd 1 — deliberately not
/// `io::stdout()`, whose lock may be held by the panicking thread —
/// then termios reset from the saved cell. Errors are ignored; there
/// is nothing left to do with them.
fn panic_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            RESTORE_BYTES.as_ptr().cast::<libc::c_void>(),
            RESTORE_BYTES.len(),
        );
        if let Some(saved) = SAVED_TERMIOS.get() {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, saved);
        }
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(RESTORE_BYTES);
        let _ = io::stdout().flush();
    }
}

// ─── Raw mode ───────────────────────────────────────────────────────────────

/// Capture the cooked state, then switch stdin to raw. No-op off a TTY.
#[cfg(unix)]
fn set_raw_mode() -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    if !is_tty() {
        return Ok(());
    }
    let fd = io::stdin().as_raw_fd();

    unsafe {
        let mut tio: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &raw mut tio) != 0 {
            return Err(io::Error::last_os_error());
        }
        let _ = SAVED_TERMIOS.set(tio);

        // cfmakeraw: no echo, no canonical line buffering, no signal
        // keys — Ctrl-C reaches the session loop as byte 3.
        libc::cfmakeraw(&raw mut tio);
        // One byte at a time, blocking, no read timeout.
        tio.c_cc[libc::VMIN] = 1;
        tio.c_cc[libc::VTIME] = 0;

        if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const tio) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_raw_mode() -> io::Result<()> {
    Ok(())
}

/// Put termios back to the saved cooked state. No-op if raw mode was
/// never entered (not a TTY).
#[cfg(unix)]
fn unset_raw_mode() -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let Some(saved) = SAVED_TERMIOS.get() else {
        return Ok(());
    };
    let fd = io::stdin().as_raw_fd();

    unsafe {
        if libc::tcsetattr(fd, libc::TCSAFLUSH, saved) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn unset_raw_mode() -> io::Result<()> {
    Ok(())
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with guaranteed restore.
///
/// Call [`enter`](Self::enter) to switch to trainer mode (raw mode,
/// alternate screen, hidden cursor). [`leave`](Self::leave) — or drop,
/// or a panic — puts everything back.
///
/// # Example
///
/// ```no_run
/// use tl_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... run sessions ...
/// // Terminal is restored automatically on drop.
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    /// Whether we're in trainer mode (raw + alt screen).
    active: bool,
}

impl Terminal {
    /// Create an inactive terminal handle.
    ///
    /// Does **not** touch the terminal — call [`enter`](Self::enter) for that.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: false }
    }

    /// Whether we're currently in trainer mode.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter trainer mode.
    ///
    /// Switches stdin to raw, arms the panic hook, then moves stdout to
    /// a cleared alternate screen with the hardware cursor hidden.
    ///
    /// Idempotent: calling `enter()` while already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        set_raw_mode()?;
        arm_panic_hook();

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::enter_alt_screen(&mut lock)?;
        ansi::clear_screen(&mut lock)?;
        ansi::cursor_home(&mut lock)?;
        ansi::cursor_hide(&mut lock)?;
        lock.flush()?;

        self.active = true;
        log::debug!("terminal entered raw/alt-screen mode");
        Ok(())
    }

    /// Leave trainer mode and restore the terminal.
    ///
    /// Emits [`RESTORE_BYTES`] (the same sequence the panic hook uses),
    /// then puts termios back. Idempotent: calling `leave()` while
    /// inactive is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or the termios reset fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(RESTORE_BYTES)?;
            lock.flush()?;
        }
        unset_raw_mode()?;

        self.active = false;
        log::debug!("terminal restored");
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
