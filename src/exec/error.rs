//! Command execution errors

use thiserror::Error;

/// Error types for external command execution
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read output of `{command}`: {source}")]
    Io {
        command: String,
        output: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{command}` failed with {}", describe_exit(.code))]
    Exit {
        command: String,
        code: Option<i32>,
        output: Vec<String>,
    },
}

impl CommandError {
    /// Output lines captured before the failure
    pub fn output(&self) -> &[String] {
        match self {
            CommandError::Spawn { .. } => &[],
            CommandError::Io { output, .. } | CommandError::Exit { output, .. } => output,
        }
    }

    /// The command line that was attempted
    pub fn command(&self) -> &str {
        match self {
            CommandError::Spawn { command, .. }
            | CommandError::Io { command, .. }
            | CommandError::Exit { command, .. } => command,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}
