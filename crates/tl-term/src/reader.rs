// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader — collects raw bytes from the terminal.
//
// A dedicated thread reads stdin one byte at a time and sends each byte
// through a bounded channel. The session loop receives them with
// `recv_timeout`, which is what lets one thread multiplex keystrokes
// against the 1-Hz countdown tick and the session deadline.
//
// The channel is a `sync_channel` with a small capacity: typing
// bandwidth is tiny, and if the consumer ever stalls the reader simply
// blocks in `send` rather than buffering unboundedly.
//
// Shutdown: the reader thread uses `poll()` with a short timeout on
// stdin's file descriptor, checking an `AtomicBool` stop flag between
// polls. In the trainer the reader lives for the whole program and is
// never stopped explicitly; the flag exists so tests (and `Drop`) can
// join the thread instead of leaking it. On stdin EOF or error the
// thread exits silently and the channel disconnects — the session loop
// treats that as an interrupt.

#[cfg(unix)]
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::thread::{self, JoinHandle};

/// Capacity of the keystroke channel.
///
/// A human types a handful of bytes per second; 64 gives the consumer
/// plenty of slack across a render without ever growing a real backlog.
const CHANNEL_CAPACITY: usize = 64;

/// How often the reader thread checks the stop flag (milliseconds).
const POLL_TIMEOUT_MS: i32 = 50;

/// Background stdin reader thread.
///
/// Spawns a thread that reads raw bytes from stdin and sends them,
/// one at a time, through a bounded channel.
///
/// # Example
///
/// ```no_run
/// use tl_term::reader::StdinReader;
///
/// let (reader, rx) = StdinReader::spawn();
///
/// // Receive keystrokes:
/// while let Ok(byte) = rx.recv() {
///     println!("got byte {byte}");
/// }
/// // Reader stops when dropped.
/// ```
pub struct StdinReader {
    /// The reader thread handle. `None` after `stop()` joins it.
    handle: Option<JoinHandle<()>>,
    /// Shared flag to signal the thread to exit.
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the background reader thread.
    ///
    /// Returns the reader handle and the receiving half of the keystroke
    /// channel. The channel closes when the reader is stopped or stdin
    /// hits EOF.
    ///
    /// # Panics
    ///
    /// Panics if the OS cannot spawn a new thread (extremely rare).
    #[must_use]
    pub fn spawn() -> (Self, Receiver<u8>) {
        let (tx, rx) = sync_channel(CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                Self::reader_loop(&tx, &stop_flag);
            })
            .expect("failed to spawn stdin reader thread");

        (
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        )
    }

    /// Signal the reader thread to stop and wait for it to exit.
    ///
    /// Idempotent: calling `stop()` after the thread has already
    /// exited is a no-op.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// The reader thread's main loop.
    ///
    /// Polls stdin with a short timeout, reads one byte, and sends it
    /// through the channel. Exits when the stop flag is set, stdin
    /// reaches EOF, or the channel is disconnected.
    #[cfg(unix)]
    fn reader_loop(tx: &SyncSender<u8>, stop: &AtomicBool) {
        use std::os::unix::io::AsRawFd;

        let stdin_fd = io::stdin().as_raw_fd();
        let mut buf = [0u8; 1];

        loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            // Poll stdin for readability with a timeout.
            let ready = unsafe {
                let mut pfd = libc::pollfd {
                    fd: stdin_fd,
                    events: libc::POLLIN,
                    revents: 0,
                };
                libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
            };

            // Timeout or error: loop back to check the stop flag.
            if ready <= 0 {
                continue;
            }

            // Data available — read exactly one byte.
            let n = unsafe { libc::read(stdin_fd, buf.as_mut_ptr().cast(), 1) };

            if n <= 0 {
                // EOF or error — exit the thread.
                log::debug!("stdin reader: EOF/error, exiting");
                break;
            }

            if tx.send(buf[0]).is_err() {
                // Receiver dropped — nobody's listening.
                break;
            }
        }
    }

    /// Non-unix fallback using blocking reads with no poll.
    ///
    /// Less graceful shutdown (thread blocks in read), but functional.
    #[cfg(not(unix))]
    fn reader_loop(tx: &SyncSender<u8>, stop: &AtomicBool) {
        use std::io::Read;

        let stdin = std::io::stdin();
        let mut buf = [0u8; 1];

        loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            match stdin.lock().read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if tx.send(buf[0]).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn poll_timeout_reasonable() {
        assert!(POLL_TIMEOUT_MS >= 10);
        assert!(POLL_TIMEOUT_MS <= 500);
    }

    #[test]
    fn spawn_and_stop() {
        // Spawn reader — it won't read anything useful in tests (stdin
        // is not a terminal), but it must not panic or hang.
        let (mut reader, _rx) = StdinReader::spawn();
        reader.stop();
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut reader, _rx) = StdinReader::spawn();
        reader.stop();
        reader.stop(); // Second call must not panic.
    }

    #[test]
    fn drop_stops_reader() {
        let (reader, _rx) = StdinReader::spawn();
        drop(reader); // Must not hang.
    }

    #[test]
    fn channel_closes_on_stop() {
        let (mut reader, rx) = StdinReader::spawn();
        reader.stop();

        // After stop, the channel should be closed — recv should fail.
        // Drain any bytes that arrived before stop.
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
