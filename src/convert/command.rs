//! Conversion through an external program.
//!
//! The TeX source is written to the program's stdin and its stdout is
//! taken as the converted text, e.g. `latex2text` or
//! `pandoc -f latex -t plain`.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use log::debug;

use super::LatexToText;
use crate::error::ConversionError;

/// Runs an external LaTeX-to-text converter per document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    /// Converter running `program` without arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Build from a whitespace-separated command line such as
    /// `"pandoc -f latex -t plain"`. Returns `None` for a blank line.
    ///
    /// ```rust
    /// use tex2corpus::CommandConverter;
    ///
    /// let converter = CommandConverter::from_command_line("pandoc -f latex -t plain").unwrap();
    /// assert_eq!(converter.program(), "pandoc");
    /// assert!(CommandConverter::from_command_line("   ").is_none());
    /// ```
    #[must_use]
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(parts.fold(Self::new(program), Self::arg))
    }

    /// Program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn spawn_error(&self, source: io::Error) -> ConversionError {
        ConversionError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl LatexToText for CommandConverter {
    fn latex_to_text(&self, tex: &str) -> Result<String, ConversionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.spawn_error(io::Error::other("stdin not captured")))?;

        // Feed stdin from a separate thread so a chatty child cannot
        // deadlock on a full stdout pipe
        let input = tex.to_owned();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;
        if let Ok(Err(e)) = writer.join() {
            debug!("{} closed stdin early: {e}", self.program);
        }

        if !output.status.success() {
            return Err(ConversionError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ConversionError::InvalidOutput)
    }
}
