//! Core trait definitions.
//!
//! The drill scheduler talks to the user only through [`Console`]. The CLI
//! provides a raw-mode terminal implementation; tests and piped input use
//! [`crate::console::LineConsole`].

use anyhow::Result;

// ---------------------------------------------------------------------------
// Console trait
// ---------------------------------------------------------------------------

/// Line-oriented interactive I/O.
pub trait Console {
    /// Show `prompt` (without a trailing newline) and read one line of input.
    ///
    /// Returns `Ok(None)` when input is exhausted or the user interrupted the
    /// session. The returned line has its line terminator stripped.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Print one line of output.
    fn print_line(&mut self, text: &str) -> Result<()>;
}

impl<C: Console + ?Sized> Console for Box<C> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        (**self).read_line(prompt)
    }

    fn print_line(&mut self, text: &str) -> Result<()> {
        (**self).print_line(text)
    }
}
