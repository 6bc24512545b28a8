//! Line console over an arbitrary reader and writer.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};

use crate::traits::Console;

enum LineEvent {
    Line(String),
    End,
    Failed(io::Error),
}

/// A [`Console`] that reads whole lines and writes to `W`.
///
/// Lines are read on a background thread so that a pending read can be cut
/// short through an [`Interrupter`]. End of input or an interrupt ends the
/// session; every later read returns `None` as well.
pub struct LineConsole<W> {
    lines: Receiver<LineEvent>,
    wake: Sender<LineEvent>,
    interrupted: Arc<AtomicBool>,
    finished: bool,
    writer: W,
}

/// Ends the session of the [`LineConsole`] it came from, even while it is
/// blocked waiting for input. Safe to call from a signal handler thread.
#[derive(Clone)]
pub struct Interrupter {
    wake: Sender<LineEvent>,
    interrupted: Arc<AtomicBool>,
}

impl Interrupter {
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
        let _ = self.wake.send(LineEvent::End);
    }
}

impl<W: Write> LineConsole<W> {
    pub fn new<R>(reader: R, writer: W) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let feeder = tx.clone();
        thread::spawn(move || feed_lines(reader, feeder));
        Self {
            lines: rx,
            wake: tx,
            interrupted: Arc::new(AtomicBool::new(false)),
            finished: false,
            writer,
        }
    }

    pub fn interrupter(&self) -> Interrupter {
        Interrupter {
            wake: self.wake.clone(),
            interrupted: Arc::clone(&self.interrupted),
        }
    }

    /// Consume the console, returning the writer (handy for inspecting
    /// captured output).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}

fn feed_lines<R: BufRead>(mut reader: R, tx: Sender<LineEvent>) {
    loop {
        let mut line = String::new();
        let event = match reader.read_line(&mut line) {
            Ok(0) => LineEvent::End,
            Ok(_) => {
                let trimmed = line.strip_suffix('\n').unwrap_or(&line);
                let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
                LineEvent::Line(trimmed.to_string())
            }
            Err(e) => LineEvent::Failed(e),
        };
        let last = !matches!(event, LineEvent::Line(_));
        if tx.send(event).is_err() || last {
            return;
        }
    }
}

impl<W: Write> Console for LineConsole<W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.writer, "{prompt}").context("failed to write prompt")?;
        self.writer.flush().context("failed to flush prompt")?;

        if self.finished || self.is_interrupted() {
            self.finished = true;
            return Ok(None);
        }

        match self.lines.recv() {
            Ok(LineEvent::Line(line)) if !self.is_interrupted() => Ok(Some(line)),
            Ok(LineEvent::Failed(e)) => {
                self.finished = true;
                Err(e).context("failed to read answer")
            }
            _ => {
                self.finished = true;
                Ok(None)
            }
        }
    }

    fn print_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{text}").context("failed to write output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};
    use std::time::Duration;

    /// Blocks until its sender is dropped, then reports end of input.
    struct Stalled(Receiver<()>);

    impl Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[test]
    fn reads_lines_until_eof() {
        let mut console = LineConsole::new(Cursor::new("sem\r\nsi\n"), Vec::new());
        assert_eq!(console.read_line("> ").unwrap().as_deref(), Some("sem"));
        assert_eq!(console.read_line("> ").unwrap().as_deref(), Some("si"));
        assert_eq!(console.read_line("> ").unwrap(), None);
        let out = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(out, "> > > ");
    }

    #[test]
    fn blank_line_is_not_eof() {
        let mut console = LineConsole::new(Cursor::new("\n"), Vec::new());
        assert_eq!(console.read_line("").unwrap().as_deref(), Some(""));
        assert_eq!(console.read_line("").unwrap(), None);
        assert_eq!(console.read_line("").unwrap(), None);
    }

    #[test]
    fn print_line_appends_newline() {
        let mut console = LineConsole::new(Cursor::new(""), Vec::new());
        console.print_line("Correct answer: \"sem\"").unwrap();
        let out = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(out, "Correct answer: \"sem\"\n");
    }

    #[test]
    fn interrupt_wakes_a_blocked_read() {
        let (_hold, stall) = mpsc::channel::<()>();
        let reader = BufReader::new(Cursor::new("sem\n").chain(Stalled(stall)));
        let mut console = LineConsole::new(reader, Vec::new());
        assert_eq!(console.read_line("").unwrap().as_deref(), Some("sem"));

        let interrupter = console.interrupter();
        let signal = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            interrupter.interrupt();
        });

        assert_eq!(console.read_line("").unwrap(), None);
        assert_eq!(console.read_line("").unwrap(), None);
        signal.join().unwrap();
    }

    #[test]
    fn interrupt_drops_lines_still_queued() {
        let mut console = LineConsole::new(Cursor::new("a\nb\nc\n"), Vec::new());
        console.interrupter().interrupt();
        assert_eq!(console.read_line("").unwrap(), None);
    }
}
