// SPDX-License-Identifier: MIT
//
// Target text provisioning.
//
// Two sources: uniform random draws from a word list (with replacement),
// and pangram sentences. Word-count mode materializes exactly the
// requested number of tokens; timed mode starts from a large buffer and
// grows on demand through [`TextProvider::extend`] when the typist
// catches up to the end.
//
// The engine is byte-oriented ASCII throughout, so the word list parser
// drops any token that isn't pure ASCII.

use rand::Rng;
use rand::rngs::ThreadRng;

use crate::config::{Config, TextSource};
use crate::error::{Error, Result};

/// Initial token count for a timed words session.
const TIMED_WORDS_BUFFER: usize = 1000;

/// Tokens appended per [`TextProvider::extend`] call.
const EXTEND_WORDS: usize = 100;

/// Pangrams concatenated for a timed sentences session.
const TIMED_SENTENCES_BUFFER: usize = 100;

/// The default word list, embedded at compile time.
///
/// Newline-delimited common English words; see `assets/words.txt`.
const BUILTIN_WORDS: &str = include_str!("../assets/words.txt");

/// Built-in pangram sentences (every letter of the alphabet at least once).
const PANGRAMS: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "Pack my box with five dozen liquor jugs.",
    "How vexingly quick daft zebras jump!",
    "Sphinx of black quartz, judge my vow.",
    "The five boxing wizards jump quickly.",
    "Jackdaws love my big sphinx of quartz.",
    "Waltz, bad nymph, for quick jigs vex.",
    "Quick zephyrs blow, vexing daft Jim.",
    "Two driven jocks help fax my big quiz.",
    "The jay, pig, fox, zebra and my wolves quack!",
    "Grumpy wizards make toxic brew for the evil queen and jack.",
    "A wizard's job is to vex chumps quickly in fog.",
];

// ─── WordList ───────────────────────────────────────────────────────────────

/// A pool of candidate tokens for random text generation.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Parse a newline-delimited word list.
    ///
    /// Tokens are trimmed; blank lines and non-ASCII tokens are dropped.
    ///
    /// # Errors
    ///
    /// [`Error::SourceEmpty`] if no usable token survives.
    pub fn parse(text: &str) -> Result<Self> {
        let words: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| {
                if line.is_ascii() {
                    true
                } else {
                    log::warn!("word list: dropping non-ASCII token {line:?}");
                    false
                }
            })
            .map(ToOwned::to_owned)
            .collect();

        if words.is_empty() {
            return Err(Error::SourceEmpty);
        }
        Ok(Self { words })
    }

    /// The embedded default list.
    ///
    /// # Errors
    ///
    /// [`Error::SourceEmpty`] if the embedded asset somehow parses to
    /// nothing — a build problem, but not worth a panic path.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_WORDS)
    }

    /// Number of tokens in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the pool is empty. (Parsing rejects this state.)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

// ─── TextProvider ───────────────────────────────────────────────────────────

/// Materializes session text from a [`WordList`] and an RNG.
///
/// Generic over [`Rng`] so tests can inject a seeded `StdRng`; production
/// code uses [`TextProvider::new`] with the thread-local generator.
pub struct TextProvider<R: Rng> {
    list: WordList,
    rng: R,
}

impl TextProvider<ThreadRng> {
    /// Provider backed by the thread-local RNG.
    #[must_use]
    pub fn new(list: WordList) -> Self {
        Self::with_rng(list, rand::thread_rng())
    }
}

impl<R: Rng> TextProvider<R> {
    /// Provider with an explicit RNG (seeded in tests).
    #[must_use]
    pub fn with_rng(list: WordList, rng: R) -> Self {
        Self { list, rng }
    }

    /// Materialize the target text for one session.
    #[must_use]
    pub fn session_text(&mut self, config: &Config) -> String {
        let text = match (config.source, config.is_timed()) {
            (TextSource::Words, false) => self.random_words(config.word_count),
            (TextSource::Words, true) => self.random_words(TIMED_WORDS_BUFFER),
            (TextSource::Sentences, false) => self.random_pangram().to_owned(),
            (TextSource::Sentences, true) => {
                let mut parts = Vec::with_capacity(TIMED_SENTENCES_BUFFER);
                for _ in 0..TIMED_SENTENCES_BUFFER {
                    parts.push(self.random_pangram());
                }
                parts.join(" ")
            }
        };
        log::debug!("session text: {} bytes", text.len());
        text
    }

    /// One leading space plus [`EXTEND_WORDS`] fresh random words, to be
    /// appended when a timed session reaches the end of its buffer.
    #[must_use]
    pub fn extend(&mut self) -> String {
        let mut chunk = String::from(" ");
        chunk.push_str(&self.random_words(EXTEND_WORDS));
        chunk
    }

    /// `count` uniform draws with replacement, joined by single spaces.
    fn random_words(&mut self, count: usize) -> String {
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            let idx = self.rng.gen_range(0..self.list.words.len());
            parts.push(self.list.words[idx].as_str());
        }
        parts.join(" ")
    }

    fn random_pangram(&mut self) -> &'static str {
        PANGRAMS[self.rng.gen_range(0..PANGRAMS.len())]
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn provider() -> TextProvider<StdRng> {
        TextProvider::with_rng(WordList::builtin().unwrap(), StdRng::seed_from_u64(7))
    }

    fn small_provider(words: &str) -> TextProvider<StdRng> {
        TextProvider::with_rng(WordList::parse(words).unwrap(), StdRng::seed_from_u64(7))
    }

    // ── WordList parsing ────────────────────────────────────────────────

    #[test]
    fn parse_skips_blank_lines() {
        let list = WordList::parse("one\n\n  \ntwo\n").unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn parse_trims_whitespace() {
        let list = WordList::parse("  hello  \n").unwrap();
        assert_eq!(list.words[0], "hello");
    }

    #[test]
    fn parse_drops_non_ascii() {
        let list = WordList::parse("plain\ncafé\n").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.words[0], "plain");
    }

    #[test]
    fn parse_empty_is_source_empty() {
        assert!(matches!(WordList::parse(""), Err(Error::SourceEmpty)));
        assert!(matches!(WordList::parse("\n \n"), Err(Error::SourceEmpty)));
    }

    #[test]
    fn builtin_list_is_usable() {
        let list = WordList::builtin().unwrap();
        assert!(list.len() > 100);
        assert!(!list.is_empty());
    }

    // ── Session text policies ───────────────────────────────────────────

    #[test]
    fn word_count_mode_yields_exact_count() {
        let text = provider().session_text(&Config::words(TextSource::Words, 12));
        assert_eq!(text.split(' ').count(), 12);
    }

    #[test]
    fn word_text_is_single_space_joined() {
        let text = provider().session_text(&Config::words(TextSource::Words, 50));
        assert!(!text.contains("  "));
        assert!(!text.starts_with(' '));
        assert!(!text.ends_with(' '));
    }

    #[test]
    fn timed_words_buffer_is_one_thousand() {
        let text = provider().session_text(&Config::timed(TextSource::Words, 30));
        assert_eq!(text.split(' ').count(), TIMED_WORDS_BUFFER);
    }

    #[test]
    fn untimed_sentences_is_one_pangram() {
        let text = provider().session_text(&Config::words(TextSource::Sentences, 3));
        assert!(PANGRAMS.contains(&text.as_str()));
    }

    #[test]
    fn timed_sentences_concatenates_one_hundred() {
        let text = provider().session_text(&Config::timed(TextSource::Sentences, 30));
        // Every pangram ends with punctuation, so sentence count is
        // easiest to verify by counting terminal marks.
        let terminals = text.chars().filter(|c| matches!(c, '.' | '!')).count();
        assert_eq!(terminals, TIMED_SENTENCES_BUFFER);
        assert!(!text.contains("  "));
    }

    #[test]
    fn all_outputs_are_ascii() {
        let mut p = provider();
        for config in [
            Config::words(TextSource::Words, 30),
            Config::timed(TextSource::Words, 30),
            Config::words(TextSource::Sentences, 1),
            Config::timed(TextSource::Sentences, 30),
        ] {
            assert!(p.session_text(&config).is_ascii());
        }
    }

    // ── Extension ───────────────────────────────────────────────────────

    #[test]
    fn extend_leads_with_exactly_one_space() {
        let chunk = provider().extend();
        assert!(chunk.starts_with(' '));
        assert!(!chunk[1..].starts_with(' '));
    }

    #[test]
    fn extend_appends_one_hundred_words() {
        let chunk = provider().extend();
        assert_eq!(chunk[1..].split(' ').count(), EXTEND_WORDS);
    }

    #[test]
    fn single_word_list_repeats_that_word() {
        let mut p = small_provider("echo");
        let text = p.session_text(&Config::words(TextSource::Words, 3));
        assert_eq!(text, "echo echo echo");
    }

    // ── Pangram table ───────────────────────────────────────────────────

    #[test]
    fn pangrams_are_genuine() {
        for pangram in PANGRAMS {
            for letter in b'a'..=b'z' {
                assert!(
                    pangram.to_ascii_lowercase().contains(letter as char),
                    "{pangram:?} is missing {:?}",
                    letter as char
                );
            }
            assert!(pangram.is_ascii());
        }
    }
}
