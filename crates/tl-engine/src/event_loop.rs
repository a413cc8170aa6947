// SPDX-License-Identifier: MIT
//
// The session event loop — the heartbeat of one typing attempt.
//
// One thread multiplexes three event sources over a single bounded
// channel wait:
//
//   1. **Keystrokes** arrive on the channel fed by the background
//      stdin reader; `recv_timeout` returns them immediately.
//   2. **The 1-Hz tick** (timed mode) is the timeout itself: the wait
//      is capped at the time to the next whole second so the countdown
//      repaints even when the typist pauses.
//   3. **The deadline** (timed mode) also caps the wait. It is
//      absolute — `start_time + time_limit`, computed once — and is
//      checked both before waiting and after every received byte, so a
//      keystroke racing the deadline loses: once time is up, pending
//      input is discarded.
//
// Untimed sessions block on the channel with no timeout; the only exits
// are completing the text, Ctrl-C, and a disconnected channel (stdin
// EOF).
//
// State mutation and frame emission both happen here and only here;
// the input thread never touches either.

use std::io::Write;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use rand::Rng;

use tl_term::key::{self, Key};

use crate::error::Result;
use crate::render;
use crate::session::TypingState;
use crate::text::TextProvider;

/// Countdown repaint period.
const TICK: Duration = Duration::from_secs(1);

/// How long after an ESC byte follow-on sequence bytes are discarded.
const ESC_DRAIN_WINDOW: Duration = Duration::from_millis(10);

/// Longest escape sequence worth draining (covers CSI arrows, F-keys).
const ESC_DRAIN_MAX: usize = 10;

/// How one session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The target text was completed (untimed) or the clock ran out
    /// (timed). The controller moves on to the post-session prompt.
    Finished,
    /// Ctrl-C, or stdin closed mid-session. The controller exits
    /// without prompting.
    Interrupted,
}

/// Run one typing attempt to completion.
///
/// `state` carries the target text and is mutated in place; `keys` is
/// the stdin byte channel; `provider` supplies text extensions when a
/// timed session catches up to its buffer; frames go to `out` (stdout
/// in production, a capture buffer in tests).
///
/// # Errors
///
/// Only frame-write failures surface as errors; every input condition
/// maps to a [`SessionEnd`].
pub fn run_session<R: Rng, W: Write>(
    state: &mut TypingState,
    keys: &Receiver<u8>,
    provider: &mut TextProvider<R>,
    out: &mut W,
) -> Result<SessionEnd> {
    let started = Instant::now();
    state.start(started);
    paint(state, started, out)?;

    let mut next_tick = started + TICK;

    loop {
        let now = Instant::now();
        if deadline_passed(state, now) {
            return Ok(SessionEnd::Finished);
        }

        // Keep the buffer ahead of the typist before blocking.
        if state.is_timed() && state.at_end() {
            state.extend_text(&provider.extend());
            paint(state, now, out)?;
        }

        let received = if let Some(deadline) = state.deadline() {
            let wake = deadline.min(next_tick);
            let timeout = wake.saturating_duration_since(Instant::now());
            match keys.recv_timeout(timeout) {
                Ok(byte) => Some(byte),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("keystroke channel disconnected mid-session");
                    return Ok(SessionEnd::Interrupted);
                }
            }
        } else {
            match keys.recv() {
                Ok(byte) => Some(byte),
                Err(_) => {
                    log::debug!("keystroke channel disconnected mid-session");
                    return Ok(SessionEnd::Interrupted);
                }
            }
        };

        let now = Instant::now();
        // Time-up outranks any keystroke that raced it through the channel.
        if deadline_passed(state, now) {
            return Ok(SessionEnd::Finished);
        }

        match received {
            None => {
                // Tick: nothing to apply, just refresh the countdown.
                while next_tick <= now {
                    next_tick += TICK;
                }
            }
            Some(byte) => match key::classify(byte) {
                Key::CtrlC => return Ok(SessionEnd::Interrupted),
                Key::Esc => drain_escape(keys),
                Key::Backspace => state.backspace(),
                Key::Space => state.space(),
                Key::Char(c) => state.type_char(c),
                Key::Enter | Key::Other(_) => {}
            },
        }

        paint(state, Instant::now(), out)?;

        if !state.is_timed() && state.at_end() {
            return Ok(SessionEnd::Finished);
        }
    }
}

/// Render and emit one frame, then record its height for the next clear.
fn paint<W: Write>(state: &mut TypingState, now: Instant, out: &mut W) -> Result<()> {
    let frame = render::frame(state, now)?;
    out.write_all(&frame.bytes)?;
    out.flush()?;
    state.set_last_line_count(frame.line_count);
    Ok(())
}

fn deadline_passed(state: &TypingState, now: Instant) -> bool {
    state.deadline().is_some_and(|deadline| now >= deadline)
}

/// Swallow the tail of an escape sequence: up to [`ESC_DRAIN_MAX`]
/// bytes arriving within [`ESC_DRAIN_WINDOW`] of the ESC itself.
fn drain_escape(keys: &Receiver<u8>) {
    let deadline = Instant::now() + ESC_DRAIN_WINDOW;
    for _ in 0..ESC_DRAIN_MAX {
        let Some(left) = deadline.checked_duration_since(Instant::now()) else {
            break;
        };
        if keys.recv_timeout(left).is_err() {
            break;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
