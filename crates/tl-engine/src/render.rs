// SPDX-License-Identifier: MIT
//
// Frame rendering.
//
// A frame is a pure function of the session state and the clock: clear
// the previous frame's region, optionally paint the countdown line,
// then paint the visible window of wrapped text with per-character
// color — green for correct, red for wrong or skipped, default for
// untyped — and a yellow-bold bar marking the cursor.
//
// The whole frame is assembled into one buffer and written with a
// single syscall by the caller; repainting in place (carriage return
// plus cursor-up, clear-to-EOL per line) keeps the update flicker-free
// without any full-screen bookkeeping.
//
// The terminal stays in raw mode, so every line break is an explicit
// CRLF.

use std::io::{self, Write};
use std::time::Instant;

use tl_term::ansi::{self, Color};

use crate::session::TypingState;
use crate::wrap::{self, WrappedLine};

/// A rendered frame: the bytes to emit and the number of lines they
/// occupy (needed to clear this frame before painting the next one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub line_count: usize,
}

/// Render the current state into a frame.
///
/// # Errors
///
/// Propagates `io::Error` from the underlying writes; writing to the
/// in-memory buffer cannot actually fail.
pub fn frame(state: &TypingState, now: Instant) -> io::Result<Frame> {
    let mut buf = Vec::with_capacity(1024);

    // Clear the previous frame: back to column zero, then up over the
    // lines painted last time (the cursor rests on the last of them).
    buf.push(b'\r');
    let prior = state.last_line_count();
    ansi::cursor_up(&mut buf, u16::try_from(prior.saturating_sub(1)).unwrap_or(u16::MAX))?;

    if state.is_timed() {
        countdown_line(&mut buf, state, now)?;
    }

    let lines = wrap::wrap(state.text(), state.position(), state.terminal_width());
    let visible = wrap::window(&lines);

    for (i, line) in visible.iter().enumerate() {
        if i > 0 {
            buf.extend_from_slice(b"\r\n");
        }
        text_line(&mut buf, line, state)?;
    }

    Ok(Frame {
        line_count: visible.len() + usize::from(state.is_timed()),
        bytes: buf,
    })
}

/// The countdown: whole seconds remaining, rounded up so the display
/// reads the configured limit on the first frame and `1` on the last.
fn countdown_line(buf: &mut Vec<u8>, state: &TypingState, now: Instant) -> io::Result<()> {
    let seconds = state.remaining(now).as_millis().div_ceil(1000);
    ansi::fg(buf, Color::Blue)?;
    write!(buf, "{seconds}")?;
    ansi::reset(buf)?;
    ansi::clear_line(buf)?;
    buf.extend_from_slice(b"\r\n");
    Ok(())
}

/// Paint one wrapped line: colored characters, the cursor bar, and a
/// clear-to-EOL to erase whatever the previous frame left behind.
fn text_line(buf: &mut Vec<u8>, line: &WrappedLine, state: &TypingState) -> io::Result<()> {
    // Glyph budget for the line: the bar plus a line-break space can
    // push a cursor line one past the wrap width, and a glyph in the
    // final column must not trip the terminal's autowrap.
    let budget = usize::from(state.terminal_width());
    let mut emitted = 0usize;
    let mut current: Option<Color> = None;

    for (k, (&byte, &index)) in line.content.iter().zip(&line.char_indices).enumerate() {
        if line.has_cursor && k == line.cursor_position {
            cursor_bar(buf)?;
            current = None;
            emitted += 1;
        }
        if emitted >= budget {
            break;
        }
        let color = color_at(state, index);
        if current != Some(color) {
            ansi::fg(buf, color)?;
            current = Some(color);
        }
        buf.push(byte);
        emitted += 1;
    }

    // Cursor past the last character: bar at end of line.
    if line.has_cursor && line.cursor_position >= line.content.len() {
        cursor_bar(buf)?;
    }

    ansi::reset(buf)?;
    ansi::clear_line(buf)
}

/// The yellow-bold vertical bar marking where the next keystroke lands.
fn cursor_bar(buf: &mut Vec<u8>) -> io::Result<()> {
    ansi::fg(buf, Color::Yellow)?;
    ansi::bold(buf)?;
    buf.push(b'|');
    ansi::reset(buf)
}

/// Feedback color for the character at `index`.
fn color_at(state: &TypingState, index: usize) -> Color {
    if index < state.position() {
        if state.slot(index).correct() {
            Color::Green
        } else {
            Color::Red
        }
    } else {
        Color::Default
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
