//! External command execution
//!
//! Actions never spawn processes directly. They describe a [`Cmd`] and hand it
//! to a [`CommandRunner`], which makes it possible to run against the local
//! host in production and against a scripted runner in tests.

pub mod error;
pub mod host;

use async_trait::async_trait;
use std::fmt;

pub use error::CommandError;
pub use host::HostRunner;

/// A program invocation: executable name plus arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    /// Program to execute (looked up on PATH when not absolute)
    pub program: String,

    /// Arguments passed verbatim, no shell involved
    pub args: Vec<String>,
}

impl Cmd {
    /// Create a command with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Human-readable command line, used in logs and error messages
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Runs external commands and captures their output
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `cmd` to completion and return stdout and stderr merged as lines,
    /// in the order they were produced.
    ///
    /// # Errors
    /// Returns [`CommandError`] if the process cannot be spawned, its output
    /// cannot be read, or it exits non-zero. Lines captured before the
    /// failure are kept on the error (see [`CommandError::output`]).
    async fn combined_output_lines(&self, cmd: &Cmd) -> Result<Vec<String>, CommandError>;
}
