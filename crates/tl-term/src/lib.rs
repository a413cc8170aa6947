// SPDX-License-Identifier: MIT
//
// tl-term — Terminal layer for typeline.
//
// Direct terminal control via ANSI escape sequences and raw termios.
// This crate intentionally avoids TUI frameworks (ratatui, crossterm):
// the trainer repaints a three-line region in place, and the handful of
// escape sequences that takes are easier to own outright than to route
// through an abstraction layer.
//
// - `ansi`     — the complete escape vocabulary, as pure `impl Write` emitters
// - `terminal` — raw mode + alternate screen with guaranteed restore
// - `reader`   — background stdin thread feeding a bounded byte channel
// - `key`      — classification of raw input bytes

#[allow(clippy::missing_errors_doc)] // ANSI functions all just forward io::Write errors.
pub mod ansi;
pub mod key;
pub mod reader;
pub mod terminal;
