// SPDX-License-Identifier: MIT
//
// Session configuration.
//
// One `Config` value is built by the CLI layer and passed explicitly to
// the engine — there is no process-wide settings state. The two practice
// modes are mutually exclusive: a positive time limit means timed mode
// and the word count is not consulted; a zero time limit means the
// session runs until the fixed target text is completed.

use std::time::Duration;

/// Where the target text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSource {
    /// Random common words drawn from the word list.
    #[default]
    Words,
    /// Pangram sentences.
    Sentences,
}

/// Immutable per-run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Target text source.
    pub source: TextSource,
    /// Number of words in word-count mode. Only consulted when untimed.
    pub word_count: usize,
    /// Session length. Zero means word-count mode.
    pub time_limit: Duration,
}

impl Config {
    /// Timed session of `seconds` seconds.
    #[must_use]
    pub const fn timed(source: TextSource, seconds: u64) -> Self {
        Self {
            source,
            word_count: 0,
            time_limit: Duration::from_secs(seconds),
        }
    }

    /// Word-count session of `word_count` words.
    #[must_use]
    pub const fn words(source: TextSource, word_count: usize) -> Self {
        Self {
            source,
            word_count,
            time_limit: Duration::ZERO,
        }
    }

    /// Whether the session is bounded by the clock rather than the text.
    #[inline]
    #[must_use]
    pub const fn is_timed(&self) -> bool {
        !self.time_limit.is_zero()
    }
}

impl Default for Config {
    /// The out-of-the-box run: 30 seconds of random words.
    fn default() -> Self {
        Self::timed(TextSource::Words, 30)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_timed_thirty_seconds() {
        let config = Config::default();
        assert!(config.is_timed());
        assert_eq!(config.time_limit, Duration::from_secs(30));
        assert_eq!(config.source, TextSource::Words);
    }

    #[test]
    fn words_mode_is_untimed() {
        let config = Config::words(TextSource::Words, 25);
        assert!(!config.is_timed());
        assert_eq!(config.word_count, 25);
    }

    #[test]
    fn timed_mode_ignores_word_count() {
        let config = Config::timed(TextSource::Sentences, 60);
        assert!(config.is_timed());
        assert_eq!(config.word_count, 0);
    }
}
