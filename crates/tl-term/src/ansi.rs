// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — the renderer composes these into a
// frame buffer and the terminal driver uses them for mode switches. This
// module just knows the byte-level encoding of every terminal command the
// trainer needs; no raw escape literal appears anywhere else.
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to a `Vec<u8>` frame buffer.
use std::io::{self, Write};

// ─── Colors ──────────────────────────────────────────────────────────────────

/// The trainer's foreground palette.
///
/// Standard 8-color SGR codes only (30-37 range). Green marks correctly
/// typed characters, red wrong or skipped ones, yellow the cursor bar,
/// blue the countdown. `Default` (SGR 39) is untyped text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Terminal default foreground (SGR 39).
    #[default]
    Default,
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    /// The SGR parameter for this color.
    const fn code(self) -> u8 {
        match self {
            Self::Default => 39,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
        }
    }
}

/// Set the foreground color.
#[inline]
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    write!(w, "\x1b[{}m", color.code())
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Enable bold (SGR 1).
#[inline]
pub fn bold(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[1m")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear from the cursor to the end of the line (EL 0).
#[inline]
pub fn clear_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor up `n` rows (CUU). Emits nothing when `n` is zero —
/// `CSI 0 A` would still move one row on most terminals.
#[inline]
pub fn cursor_up(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}A")
}

/// Move the cursor to the top-left corner (CUP with no parameters).
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Enter the alternate screen buffer (DEC Private Mode 1049).
///
/// The alternate screen is a separate buffer that preserves the original
/// terminal content; on exit the user's scrollback comes back untouched.
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Exit the alternate screen buffer and restore original content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Colors ──────────────────────────────────────────────────────────

    #[test]
    fn fg_default() {
        assert_eq!(emit(|w| fg(w, Color::Default)), "\x1b[39m");
    }

    #[test]
    fn fg_red() {
        assert_eq!(emit(|w| fg(w, Color::Red)), "\x1b[31m");
    }

    #[test]
    fn fg_green() {
        assert_eq!(emit(|w| fg(w, Color::Green)), "\x1b[32m");
    }

    #[test]
    fn fg_yellow() {
        assert_eq!(emit(|w| fg(w, Color::Yellow)), "\x1b[33m");
    }

    #[test]
    fn fg_blue() {
        assert_eq!(emit(|w| fg(w, Color::Blue)), "\x1b[34m");
    }

    #[test]
    fn reset_sequence() {
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }

    #[test]
    fn bold_sequence() {
        assert_eq!(emit(|w| bold(w)), "\x1b[1m");
    }

    // ── Screen ──────────────────────────────────────────────────────────

    #[test]
    fn clear_line_sequence() {
        assert_eq!(emit(|w| clear_line(w)), "\x1b[K");
    }

    #[test]
    fn clear_screen_sequence() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_up_one() {
        assert_eq!(emit(|w| cursor_up(w, 1)), "\x1b[1A");
    }

    #[test]
    fn cursor_up_many() {
        assert_eq!(emit(|w| cursor_up(w, 42)), "\x1b[42A");
    }

    #[test]
    fn cursor_up_zero_emits_nothing() {
        assert_eq!(emit(|w| cursor_up(w, 0)), "");
    }

    #[test]
    fn cursor_home_sequence() {
        assert_eq!(emit(|w| cursor_home(w)), "\x1b[H");
    }

    #[test]
    fn cursor_hide_sequence() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
    }

    #[test]
    fn cursor_show_sequence() {
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Alternate Screen ────────────────────────────────────────────────

    #[test]
    fn enter_alt_screen_sequence() {
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
    }

    #[test]
    fn exit_alt_screen_sequence() {
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }

    // ── Composition ─────────────────────────────────────────────────────

    #[test]
    fn multiple_sequences_compose() {
        let mut buf = Vec::new();
        fg(&mut buf, Color::Green).unwrap();
        bold(&mut buf).unwrap();
        reset(&mut buf).unwrap();
        clear_line(&mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert_eq!(s, "\x1b[32m\x1b[1m\x1b[0m\x1b[K");
    }
}
