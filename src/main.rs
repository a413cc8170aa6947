// SPDX-License-Identifier: MIT
//
// typeline — a terminal typing trainer.
//
// This is the main binary that wires together the two crates:
//
//   tl-term   → raw mode, ANSI output, background stdin reader
//   tl-engine → typing state, wrapping, rendering, session loop, stats
//
// Each attempt flows through:
//
//   stdin → reader thread → byte channel → session loop → state
//   state → wrap → render → frame buffer → stdout
//
// and ends at the results report plus the (n)ext / (r)etry / (q)uit
// prompt. The controller below owns that outer loop; everything inside
// a session belongs to `tl_engine::run_session`.

use std::io::{self, Write};
use std::process;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser, ValueEnum};
use rand::Rng;

use tl_engine::{
    Config, Error, MIN_WIDTH, Results, SessionEnd, TextProvider, TextSource, TypingState,
    WordList, run_session,
};
use tl_term::ansi;
use tl_term::key::{self, Key};
use tl_term::reader::StdinReader;
use tl_term::terminal::{self, Terminal};

// ─── CLI ────────────────────────────────────────────────────────────────────

/// `«version» (commit: «c», built: «d»)` — clap prefixes the program name.
fn version_info() -> String {
    format!(
        "{} (commit: {}, built: {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("TYPELINE_COMMIT").unwrap_or("unknown"),
        option_env!("TYPELINE_BUILD_DATE").unwrap_or("unknown"),
    )
}

#[derive(Parser, Debug)]
#[command(
    name = "typeline",
    about = "A terminal typing trainer",
    version = version_info(),
    disable_version_flag = true
)]
struct Args {
    /// Timed mode: session length in seconds. Takes precedence over --words.
    #[arg(
        short = 't',
        long = "time",
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    time: Option<u64>,

    /// Word-count mode: number of words in the target text.
    #[arg(
        short = 'w',
        long = "words",
        value_name = "COUNT",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    words: Option<u64>,

    /// Target text source.
    #[arg(short = 's', long = "source", value_enum, default_value = "words")]
    source: SourceArg,

    /// Print version information.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SourceArg {
    /// Random common words.
    Words,
    /// Pangram sentences.
    Sentences,
}

impl From<SourceArg> for TextSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Words => Self::Words,
            SourceArg::Sentences => Self::Sentences,
        }
    }
}

/// Resolve the mutually exclusive mode flags: `-t` wins, then `-w`,
/// then the 30-second timed default.
fn resolve_config(args: &Args) -> Config {
    let source = TextSource::from(args.source);
    match (args.time, args.words) {
        (Some(seconds), _) => Config::timed(source, seconds),
        (None, Some(count)) => Config::words(source, usize::try_from(count).unwrap_or(usize::MAX)),
        (None, None) => Config::default(),
    }
}

// ─── Post-session prompt ────────────────────────────────────────────────────

/// How long accidental keypresses typed past the session end are
/// discarded before the prompt starts listening.
const PROMPT_DRAIN: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptChoice {
    /// Fresh target text.
    Next,
    /// Same target text, fresh attempt.
    Retry,
    /// Leave the program.
    Exit,
}

/// Map a prompt keystroke to a choice; `None` keeps listening.
const fn prompt_choice(key: Key) -> Option<PromptChoice> {
    match key {
        Key::Char(b'n' | b'N') | Key::Enter => Some(PromptChoice::Next),
        Key::Char(b'r' | b'R') => Some(PromptChoice::Retry),
        Key::Char(b'q' | b'Q') | Key::CtrlC => Some(PromptChoice::Exit),
        _ => None,
    }
}

/// Drain stray input, show the prompt, and block for an answer.
fn prompt(keys: &Receiver<u8>, out: &mut impl Write) -> tl_engine::Result<PromptChoice> {
    let deadline = Instant::now() + PROMPT_DRAIN;
    while let Some(left) = deadline.checked_duration_since(Instant::now()) {
        if keys.recv_timeout(left).is_err() {
            break;
        }
    }

    out.write_all(b"\r\n(n)ext, (r)etry, (q)uit\r\n")?;
    out.flush()?;

    loop {
        let Ok(byte) = keys.recv() else {
            // Stdin closed with no session active.
            return Err(Error::StdinClosed);
        };
        if let Some(choice) = prompt_choice(key::classify(byte)) {
            return Ok(choice);
        }
    }
}

// ─── Session controller ─────────────────────────────────────────────────────

/// The outer loop: one iteration per attempt.
fn controller<R: Rng>(
    config: &Config,
    provider: &mut TextProvider<R>,
    keys: &Receiver<u8>,
) -> tl_engine::Result<()> {
    let mut text = provider.session_text(config);

    loop {
        // A resize between attempts is picked up here; mid-session the
        // width stays fixed.
        let width = terminal::width().unwrap_or(80);
        if width < MIN_WIDTH {
            return Err(Error::TerminalTooNarrow(width));
        }

        let mut state = TypingState::new(&text, config, width);
        let stdout = io::stdout();
        let mut out = stdout.lock();

        ansi::clear_screen(&mut out)?;
        ansi::cursor_home(&mut out)?;

        let end = run_session(&mut state, keys, provider, &mut out)?;
        log::info!("session ended: {end:?}");

        let results = Results::compute(&state, Instant::now());
        out.write_all(b"\r\n\r\n")?;
        results.write_report(&mut out)?;
        out.flush()?;

        match end {
            SessionEnd::Interrupted => return Ok(()),
            SessionEnd::Finished => match prompt(keys, &mut out)? {
                PromptChoice::Next => text = provider.session_text(config),
                PromptChoice::Retry => {}
                PromptChoice::Exit => return Ok(()),
            },
        }
    }
}

/// Acquire the terminal, run the controller, restore the terminal.
fn run(config: &Config) -> tl_engine::Result<()> {
    let words = WordList::builtin()?;
    let mut provider = TextProvider::new(words);

    if !terminal::is_tty() {
        return Err(Error::TerminalAcquire(io::Error::new(
            io::ErrorKind::Unsupported,
            "stdin is not a terminal",
        )));
    }
    let width = terminal::width().unwrap_or(80);
    if width < MIN_WIDTH {
        return Err(Error::TerminalTooNarrow(width));
    }

    let mut term = Terminal::new();
    term.enter().map_err(Error::TerminalAcquire)?;

    // The reader lives for the rest of the program; dropping it at the
    // end of this function joins the thread.
    let (_reader, keys) = StdinReader::spawn();

    let result = controller(config, &mut provider, &keys);

    // Restore before main gets a chance to print any error.
    term.leave()?;
    result
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Help and version are "errors" to clap but exit 0; real
            // usage errors exit 1 rather than clap's default 2.
            let code = i32::from(err.use_stderr());
            let _ = err.print();
            process::exit(code);
        }
    };

    let config = resolve_config(&args);
    log::debug!("config: {config:?}");

    if let Err(err) = run(&config) {
        eprintln!("typeline: {err}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
