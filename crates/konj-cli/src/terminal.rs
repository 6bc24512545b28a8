//! Raw-mode terminal console.
//!
//! Reads answers key by key so that Ctrl-C ends the session like end of
//! input instead of killing the process before the cache is saved.

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use konj_core::traits::Console;

/// A [`Console`] over the controlling terminal.
pub struct TerminalConsole {
    out: Stdout,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }

    fn echo(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{text}").context("failed to write to terminal")?;
        self.out.flush().context("failed to flush terminal")?;
        Ok(())
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.echo(prompt)?;
        let _raw = RawMode::enable()?;

        let mut line = String::new();
        loop {
            let Event::Key(key) = event::read().context("failed to read key")? else {
                continue;
            };
            match classify(&key, line.is_empty()) {
                LineEdit::Insert(c) => {
                    line.push(c);
                    self.echo(c.encode_utf8(&mut [0; 4]))?;
                }
                LineEdit::Erase => {
                    if line.pop().is_some() {
                        self.echo("\u{8} \u{8}")?;
                    }
                }
                LineEdit::Submit => {
                    self.echo("\r\n")?;
                    return Ok(Some(line));
                }
                LineEdit::Quit => return Ok(None),
                LineEdit::Ignore => {}
            }
        }
    }

    fn print_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").context("failed to write to terminal")?;
        Ok(())
    }
}

/// Keeps the terminal in raw mode until dropped.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEdit {
    Insert(char),
    Erase,
    Submit,
    Quit,
    Ignore,
}

fn classify(key: &KeyEvent, line_empty: bool) -> LineEdit {
    if key.kind != KeyEventKind::Press {
        return LineEdit::Ignore;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => LineEdit::Quit,
        KeyCode::Char('d') if ctrl && line_empty => LineEdit::Quit,
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            LineEdit::Insert(c)
        }
        KeyCode::Backspace => LineEdit::Erase,
        KeyCode::Enter => LineEdit::Submit,
        _ => LineEdit::Ignore,
    }
}
