// SPDX-License-Identifier: MIT
//
// Post-session statistics.
//
// Computed over a frozen `TypingState` once the session has ended.
// The two accuracies mirror the two counter pairs: corrected accuracy
// reflects the state after backspacing, raw accuracy charges every
// keystroke ever pressed. WPM uses the classic five-characters-per-word
// convention and counts only correctly typed characters.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::session::TypingState;

/// Statistics for one finished (or interrupted) session.
#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    /// Words per minute: correct chars / 5 / minutes.
    pub wpm: f64,
    /// Wall-clock session length.
    pub duration: Duration,
    /// Corrected accuracy in percent, `[0, 100]`.
    pub accuracy: f64,
    /// Corrected error count at session end.
    pub errors: usize,
    /// Raw accuracy in percent, `[0, 100]`.
    pub raw_accuracy: f64,
    /// Every error ever made, including skipped slots.
    pub raw_errors: usize,
    /// Backspace presses.
    pub backspaces: usize,
    /// Correctly typed characters before the cursor.
    pub correct_chars: usize,
}

impl Results {
    /// Compute statistics for `state` as of `now`.
    #[must_use]
    pub fn compute(state: &TypingState, now: Instant) -> Self {
        let duration = state
            .start_time()
            .map_or(Duration::ZERO, |t| now.saturating_duration_since(t));
        let correct_chars = state.correct_chars();

        let minutes = duration.as_secs_f64() / 60.0;
        #[allow(clippy::cast_precision_loss)] // Keystroke counts are far below 2^52.
        let wpm = if correct_chars == 0 || minutes <= 0.0 {
            0.0
        } else {
            correct_chars as f64 / 5.0 / minutes
        };

        Self {
            wpm,
            duration,
            accuracy: percentage(state.chars_typed(), state.errors()),
            errors: state.errors(),
            raw_accuracy: percentage(state.raw_keystrokes(), state.raw_errors()),
            raw_errors: state.raw_errors(),
            backspaces: state.backspace_count(),
            correct_chars,
        }
    }

    /// Print the report. CRLF line endings: the terminal is still in
    /// raw mode when this runs.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn write_report(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "WPM: {:.1}\r\n", self.wpm)?;
        write!(out, "Duration: {}s\r\n", self.duration.as_secs_f64().round())?;
        write!(out, "Accuracy: {:.1}%\r\n", self.accuracy)?;
        write!(out, "Errors: {}\r\n", self.errors)?;
        write!(out, "Raw Accuracy: {:.1}%\r\n", self.raw_accuracy)?;
        write!(out, "Raw Errors: {}\r\n", self.raw_errors)?;
        write!(out, "Backspaces: {}\r\n", self.backspaces)
    }
}

/// `(total - failed) / total` as a percentage clamped to `[0, 100]`;
/// zero when nothing was attempted.
fn percentage(total: usize, failed: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = (total.saturating_sub(failed)) as f64 / total as f64;
    (ratio * 100.0).clamp(0.0, 100.0)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, TextSource};
    use pretty_assertions::assert_eq;

    fn untimed(text: &str) -> TypingState {
        TypingState::new(text, &Config::words(TextSource::Words, 1), 80)
    }

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    // ── Accuracy ────────────────────────────────────────────────────────

    #[test]
    fn perfect_session_is_one_hundred_percent() {
        let mut s = untimed("ab");
        let t0 = Instant::now();
        s.start(t0);
        s.type_char(b'a');
        s.type_char(b'b');

        let r = Results::compute(&s, t0 + Duration::from_secs(1));
        approx(r.accuracy, 100.0);
        approx(r.raw_accuracy, 100.0);
        assert_eq!(r.errors, 0);
        assert_eq!(r.raw_errors, 0);
        assert_eq!(r.correct_chars, 2);
    }

    #[test]
    fn corrected_and_raw_accuracy_diverge_after_backspace() {
        // "cat" typed as c, a, x, backspace, t.
        let mut s = untimed("cat");
        let t0 = Instant::now();
        s.start(t0);
        s.type_char(b'c');
        s.type_char(b'a');
        s.type_char(b'x');
        s.backspace();
        s.type_char(b't');

        let r = Results::compute(&s, t0 + Duration::from_secs(1));
        approx(r.accuracy, 100.0);
        approx(r.raw_accuracy, 75.0);
        assert_eq!(r.errors, 0);
        assert_eq!(r.raw_errors, 1);
        assert_eq!(r.backspaces, 1);
    }

    #[test]
    fn empty_session_has_zero_everything() {
        let s = untimed("abc");
        let r = Results::compute(&s, Instant::now());
        approx(r.wpm, 0.0);
        approx(r.accuracy, 0.0);
        approx(r.raw_accuracy, 0.0);
        assert_eq!(r.duration, Duration::ZERO, "never started");
    }

    #[test]
    fn accuracy_stays_in_domain() {
        let mut s = untimed("abcd");
        s.start(Instant::now());
        for b in [b'z', b'z', b'z', b'z'] {
            s.type_char(b);
        }
        let r = Results::compute(&s, Instant::now());
        approx(r.accuracy, 0.0);
        approx(r.raw_accuracy, 0.0);
    }

    // ── WPM ─────────────────────────────────────────────────────────────

    #[test]
    fn wpm_counts_correct_chars_only() {
        // 10 correct chars in 60 seconds = 2 wpm.
        let mut s = untimed("the and of");
        let t0 = Instant::now();
        s.start(t0);
        for &b in b"the and of" {
            if b == b' ' {
                s.space();
            } else {
                s.type_char(b);
            }
        }
        let r = Results::compute(&s, t0 + Duration::from_secs(60));
        approx(r.wpm, 2.0);
    }

    #[test]
    fn wpm_is_zero_with_no_correct_chars() {
        let mut s = untimed("ab");
        let t0 = Instant::now();
        s.start(t0);
        s.type_char(b'x');
        let r = Results::compute(&s, t0 + Duration::from_secs(10));
        approx(r.wpm, 0.0);
    }

    #[test]
    fn wpm_is_zero_with_zero_duration() {
        let mut s = untimed("ab");
        let t0 = Instant::now();
        s.start(t0);
        s.type_char(b'a');
        let r = Results::compute(&s, t0);
        approx(r.wpm, 0.0);
    }

    #[test]
    fn skipped_slots_hurt_raw_accuracy_only() {
        let mut s = untimed("foo bar");
        let t0 = Instant::now();
        s.start(t0);
        s.type_char(b'f');
        s.type_char(b'o');
        s.space(); // skips one slot

        let r = Results::compute(&s, t0 + Duration::from_secs(1));
        approx(r.accuracy, 100.0);
        assert!(r.raw_accuracy < 100.0);
        assert_eq!(r.errors, 0);
        assert_eq!(r.raw_errors, 1);
    }

    // ── Report ──────────────────────────────────────────────────────────

    #[test]
    fn report_order_and_line_endings() {
        let mut s = untimed("ab");
        let t0 = Instant::now();
        s.start(t0);
        s.type_char(b'a');
        s.type_char(b'b');
        let r = Results::compute(&s, t0 + Duration::from_secs(2));

        let mut out = Vec::new();
        r.write_report(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let labels = [
            "WPM:",
            "Duration:",
            "Accuracy:",
            "Errors:",
            "Raw Accuracy:",
            "Raw Errors:",
            "Backspaces:",
        ];
        let mut last = 0;
        for label in labels {
            let at = text.find(label).unwrap_or_else(|| panic!("missing {label}"));
            assert!(at >= last, "{label} out of order");
            last = at;
        }
        assert_eq!(text.lines().count(), 7);
        assert!(text.ends_with("\r\n"));
        assert!(text.contains("Duration: 2s"));
    }
}
