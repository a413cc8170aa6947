// SPDX-License-Identifier: MIT
//
// Raw input byte classification.
//
// In raw mode every keypress arrives as bytes, uninterpreted. The
// trainer's input alphabet is deliberately small — printable ASCII,
// space, backspace, Enter, Ctrl-C, and ESC (the prefix of any arrow or
// function key sequence, which the session loop drains and discards).
// Everything else is ignored.

/// A classified input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Printable ASCII other than space (0x21..=0x7e).
    Char(u8),
    /// Space — may advance over a target space or skip the rest of a word.
    Space,
    /// Backspace (0x08) or DEL (0x7f) — terminals disagree on which one
    /// the backspace key sends.
    Backspace,
    /// Enter — LF (0x0a) or CR (0x0d). Ignored during typing, accepted
    /// at the post-session prompt.
    Enter,
    /// Ctrl-C (0x03). Raw mode turns off ISIG, so this is a byte, not a
    /// signal.
    CtrlC,
    /// ESC (0x1b) — start of an escape sequence; follow-on bytes are
    /// drained and discarded.
    Esc,
    /// Anything else (control bytes, high bytes). Ignored.
    Other(u8),
}

/// Classify one raw stdin byte.
#[must_use]
pub const fn classify(byte: u8) -> Key {
    match byte {
        0x03 => Key::CtrlC,
        0x08 | 0x7f => Key::Backspace,
        0x0a | 0x0d => Key::Enter,
        0x1b => Key::Esc,
        b' ' => Key::Space,
        0x21..=0x7e => Key::Char(byte),
        _ => Key::Other(byte),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
