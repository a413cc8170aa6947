// SPDX-License-Identifier: MIT
//
// The in-memory session model and its transitions.
//
// A session owns the target text as raw ASCII bytes plus one parallel
// slot array recording what happened at each index. Two counter pairs
// run side by side and must not be conflated:
//
//   chars_typed / errors         — "corrected": wound back by backspace
//   raw_keystrokes / raw_errors  — every key ever pressed: monotonic
//
// A slot filled by a word-skip counts one raw error and no corrected
// error; a mistyped slot counts one of each. Backspace only ever
// touches the corrected pair.
//
// Invariants maintained between transitions:
//   slots.len() == text.len()
//   position <= text.len()
//   errors <= chars_typed <= raw_keystrokes, errors <= raw_errors

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::MIN_WIDTH;

/// Maximum display width in columns; wider terminals are clamped.
pub const MAX_WIDTH: u16 = 80;

/// What happened at one index of the target text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    /// Not reached yet, or cleared by backspace.
    #[default]
    Untouched,
    /// Typed and matched the target.
    Correct,
    /// Typed and did not match.
    Incorrect,
    /// Abandoned by a mid-word space skip. Never typed.
    Skipped,
}

impl Slot {
    /// Whether the slot was filled by an actual keystroke.
    #[inline]
    #[must_use]
    pub const fn typed(self) -> bool {
        matches!(self, Self::Correct | Self::Incorrect)
    }

    /// Whether the slot holds a correctly typed character.
    #[inline]
    #[must_use]
    pub const fn correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// One typing attempt: target text, cursor, per-slot outcomes, counters,
/// and display bookkeeping.
///
/// Mutated only by the session loop; the renderer and [`crate::stats`]
/// read it.
#[derive(Debug, Clone)]
pub struct TypingState {
    text: Vec<u8>,
    slots: Vec<Slot>,
    position: usize,

    chars_typed: usize,
    errors: usize,
    raw_keystrokes: usize,
    raw_errors: usize,
    backspace_count: usize,

    start_time: Option<Instant>,
    time_limit: Duration,
    is_timed: bool,

    /// Lines painted by the previous render, for the in-place clear.
    last_line_count: usize,
    terminal_width: u16,
}

impl TypingState {
    /// Build a fresh state for one attempt at `text`.
    ///
    /// `terminal_width` is clamped to `[MIN_WIDTH, MAX_WIDTH]`; widths
    /// below the minimum are rejected earlier as `TerminalTooNarrow`.
    #[must_use]
    pub fn new(text: &str, config: &Config, terminal_width: u16) -> Self {
        let bytes = text.as_bytes().to_vec();
        let len = bytes.len();
        Self {
            text: bytes,
            slots: vec![Slot::Untouched; len],
            position: 0,
            chars_typed: 0,
            errors: 0,
            raw_keystrokes: 0,
            raw_errors: 0,
            backspace_count: 0,
            start_time: None,
            time_limit: config.time_limit,
            is_timed: config.is_timed(),
            last_line_count: 0,
            terminal_width: terminal_width.clamp(MIN_WIDTH, MAX_WIDTH),
        }
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Record the session start. First call wins; the session loop calls
    /// this on entry so the countdown begins with the first frame, not
    /// at construction.
    pub fn start(&mut self, now: Instant) {
        self.start_time.get_or_insert(now);
    }

    /// A printable, non-space keystroke.
    ///
    /// At end of text this is a complete no-op.
    pub fn type_char(&mut self, byte: u8) {
        let Some(&expected) = self.text.get(self.position) else {
            return;
        };
        if byte == expected {
            self.slots[self.position] = Slot::Correct;
        } else {
            self.slots[self.position] = Slot::Incorrect;
            self.errors += 1;
            self.raw_errors += 1;
        }
        self.chars_typed += 1;
        self.raw_keystrokes += 1;
        self.position += 1;
    }

    /// The space key. Three cases:
    ///
    /// - on a target space: an ordinary correct keystroke;
    /// - mid-word: abandon the rest of the word — every remaining slot
    ///   of the word is marked [`Slot::Skipped`] (one raw error each,
    ///   no corrected error), the separating space is consumed as
    ///   correct, and the cursor lands on the next word's first char;
    /// - at the start of a word: rejected, no advancement.
    ///
    /// The keystroke counts in both counter pairs in every case — the
    /// key was pressed, whether or not it moved the cursor.
    pub fn space(&mut self) {
        self.chars_typed += 1;
        self.raw_keystrokes += 1;

        let Some(&expected) = self.text.get(self.position) else {
            return;
        };

        if expected == b' ' {
            self.slots[self.position] = Slot::Correct;
            self.position += 1;
        } else if self.position > 0 && self.text[self.position - 1] != b' ' {
            // Mid-word: skip to the start of the next word.
            let word_end = self.text[self.position..]
                .iter()
                .position(|&b| b == b' ')
                .map(|offset| self.position + offset);

            if let Some(space_at) = word_end {
                for slot in &mut self.slots[self.position..space_at] {
                    *slot = Slot::Skipped;
                    self.raw_errors += 1;
                }
                self.slots[space_at] = Slot::Correct;
                self.position = space_at + 1;
            } else {
                // Last word: skip runs to the end of the text.
                for slot in &mut self.slots[self.position..] {
                    *slot = Slot::Skipped;
                    self.raw_errors += 1;
                }
                self.position = self.text.len();
            }
        }
        // Leading space at the start of a word: counted, not advanced.
    }

    /// Backspace: step the cursor back and clear the slot for fresh
    /// re-evaluation. Only a typed error refunds `errors`; the raw
    /// counters are never touched. Saturating because a backspace over
    /// a skip-filled region can outrun the corrected keystroke count.
    pub fn backspace(&mut self) {
        if self.position == 0 {
            return;
        }
        self.position -= 1;
        self.chars_typed = self.chars_typed.saturating_sub(1);
        self.backspace_count += 1;
        if self.slots[self.position] == Slot::Incorrect {
            self.errors = self.errors.saturating_sub(1);
        }
        self.slots[self.position] = Slot::Untouched;
    }

    /// Grow the target text in place (timed mode, cursor caught up).
    /// Existing slots are preserved; new slots start untouched.
    pub fn extend_text(&mut self, chunk: &str) {
        debug_assert!(chunk.is_ascii());
        self.text.extend_from_slice(chunk.as_bytes());
        self.slots.resize(self.text.len(), Slot::Untouched);
        log::debug!("text extended to {} bytes", self.text.len());
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// The target text bytes.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Cursor index into the target text, `0..=len`.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Outcome at `index`.
    #[inline]
    #[must_use]
    pub fn slot(&self, index: usize) -> Slot {
        self.slots[index]
    }

    /// Whether the cursor sits past the last character.
    #[inline]
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.position == self.text.len()
    }

    /// Corrected keystroke count (wound back by backspace).
    #[inline]
    #[must_use]
    pub const fn chars_typed(&self) -> usize {
        self.chars_typed
    }

    /// Corrected error count.
    #[inline]
    #[must_use]
    pub const fn errors(&self) -> usize {
        self.errors
    }

    /// Every keystroke ever pressed. Monotonic.
    #[inline]
    #[must_use]
    pub const fn raw_keystrokes(&self) -> usize {
        self.raw_keystrokes
    }

    /// Every error ever made, including skipped slots. Monotonic.
    #[inline]
    #[must_use]
    pub const fn raw_errors(&self) -> usize {
        self.raw_errors
    }

    /// Number of backspace presses.
    #[inline]
    #[must_use]
    pub const fn backspace_count(&self) -> usize {
        self.backspace_count
    }

    /// Session start, set on first loop entry.
    #[inline]
    #[must_use]
    pub const fn start_time(&self) -> Option<Instant> {
        self.start_time
    }

    /// Whether the session is clock-bounded.
    #[inline]
    #[must_use]
    pub const fn is_timed(&self) -> bool {
        self.is_timed
    }

    /// The configured session length (zero when untimed).
    #[inline]
    #[must_use]
    pub const fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Absolute end instant, once the session has started (timed only).
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        if self.is_timed {
            self.start_time.map(|t| t + self.time_limit)
        } else {
            None
        }
    }

    /// Time left on the clock at `now`. Zero once expired or before start.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline()
            .map_or(Duration::ZERO, |d| d.saturating_duration_since(now))
    }

    /// Display width in columns, already clamped to `[25, 80]`.
    #[inline]
    #[must_use]
    pub const fn terminal_width(&self) -> u16 {
        self.terminal_width
    }

    /// Lines painted by the previous frame.
    #[inline]
    #[must_use]
    pub const fn last_line_count(&self) -> usize {
        self.last_line_count
    }

    /// Record how many lines the frame just written occupies.
    pub fn set_last_line_count(&mut self, lines: usize) {
        self.last_line_count = lines;
    }

    /// Count of correctly typed characters before the cursor.
    #[must_use]
    pub fn correct_chars(&self) -> usize {
        self.slots[..self.position]
            .iter()
            .filter(|s| s.correct())
            .count()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
