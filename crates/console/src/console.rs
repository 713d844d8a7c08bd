//! Line-oriented console I/O.
//!
//! [`Console`] wraps an input reader, an output writer and an error writer so
//! handlers can be driven by stdin/stdout in production and by in-memory
//! buffers in tests.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while talking to the user.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Reading or writing failed.
    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input reached end of file.
    #[error("input closed")]
    Closed,

    /// A prompt expected a value of another shape.
    #[error("Your input is invalid: {field} must be {expected} (got {value:?})")]
    InvalidInput {
        /// What was being asked for.
        field: &'static str,
        /// Description of the accepted shape.
        expected: &'static str,
        /// The text that was typed.
        value: String,
    },
}

/// Console bound to a reader and two writers.
pub struct Console<R, W, E> {
    input: R,
    out: W,
    err: E,
}

/// Console over the process's standard streams.
pub type StdConsole = Console<io::StdinLock<'static>, io::Stdout, io::Stderr>;

impl StdConsole {
    /// Console over stdin, stdout and stderr.
    #[must_use]
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout(), io::stderr())
    }
}

impl<R: BufRead, W: Write, E: Write> Console<R, W, E> {
    /// Create a console from its parts.
    pub const fn new(input: R, out: W, err: E) -> Self {
        Self { input, out, err }
    }

    /// Split back into parts (tests read the writers afterwards).
    pub fn into_parts(self) -> (R, W, E) {
        (self.input, self.out, self.err)
    }

    /// Standard output writer.
    pub const fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Error writer.
    pub const fn err(&mut self) -> &mut E {
        &mut self.err
    }

    /// Read one line without its line terminator.
    ///
    /// # Errors
    ///
    /// `ConsoleError::Closed` at end of input, `ConsoleError::Io` on read failure.
    pub fn read_line(&mut self) -> Result<String, ConsoleError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ConsoleError::Closed);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Print `label` (no newline) and read the answer, trimmed.
    ///
    /// # Errors
    ///
    /// Same as [`Console::read_line`].
    pub fn prompt(&mut self, label: &str) -> Result<String, ConsoleError> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        Ok(self.read_line()?.trim().to_owned())
    }

    /// Prompt and parse the answer.
    ///
    /// # Errors
    ///
    /// `ConsoleError::InvalidInput` when the answer does not parse, plus the
    /// errors of [`Console::prompt`].
    pub fn prompt_parse<T: FromStr>(
        &mut self,
        label: &str,
        field: &'static str,
        expected: &'static str,
    ) -> Result<T, ConsoleError> {
        let answer = self.prompt(label)?;
        answer.parse().map_err(|_| ConsoleError::InvalidInput {
            field,
            expected,
            value: answer,
        })
    }

    /// Ask for a menu choice until an integer is typed.
    ///
    /// # Errors
    ///
    /// `ConsoleError::Closed` at end of input, `ConsoleError::Io` on failure.
    pub fn read_choice(&mut self) -> Result<i32, ConsoleError> {
        loop {
            let answer = self.prompt("Please make your choice: ")?;
            match answer.parse() {
                Ok(choice) => return Ok(choice),
                Err(_) => writeln!(self.out, "Your input is invalid!")?,
            }
        }
    }

    /// Write a rule line under a heading.
    ///
    /// # Errors
    ///
    /// Returns any error from the output writer.
    pub fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{}", "-".repeat(title.len().max(15)))
    }

    /// Write a separator line.
    ///
    /// # Errors
    ///
    /// Returns any error from the output writer.
    pub fn separator(&mut self) -> io::Result<()> {
        writeln!(self.out, "-------------------------")
    }
}
