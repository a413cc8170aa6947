// SPDX-License-Identifier: MIT
//
// Engine error type.
//
// Everything that can go wrong before or during a session funnels into
// this enum; the binary maps any variant to a message on stderr and
// exit code 1 after the terminal has been restored.

use std::io;

/// Minimum terminal width in columns the renderer can work with.
pub const MIN_WIDTH: u16 = 25;

/// Errors surfaced by the typing engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The terminal is narrower than [`MIN_WIDTH`] columns.
    #[error("terminal too narrow: {0} columns (minimum {MIN_WIDTH})")]
    TerminalTooNarrow(u16),

    /// Raw mode or alternate screen could not be enabled.
    #[error("failed to acquire terminal: {0}")]
    TerminalAcquire(#[source] io::Error),

    /// The word list yielded zero usable tokens.
    #[error("word list is empty")]
    SourceEmpty,

    /// Stdin closed while no session was active.
    ///
    /// Mid-session the same condition is treated as an interrupt, not
    /// an error.
    #[error("stdin closed")]
    StdinClosed,

    /// A configuration value that clap's surface cannot reject.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// Any other I/O failure (frame writes, teardown).
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Engine result alias.
pub type Result<T> = std::result::Result<T, Error>;

// ─── Tests ───────────────────────────────────────────────────────────────────
