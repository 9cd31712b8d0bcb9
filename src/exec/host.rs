//! Host command runner - executes commands as local child processes

use crate::exec::{Cmd, CommandError, CommandRunner};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs commands on the local host via `tokio::process`
///
/// There is no timeout: `kubeadm init` can legitimately take minutes, so any
/// deadline belongs to the caller.
#[derive(Debug, Clone, Default)]
pub struct HostRunner;

impl HostRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for HostRunner {
    async fn combined_output_lines(&self, cmd: &Cmd) -> Result<Vec<String>, CommandError> {
        let command = cmd.command_line();
        debug!("Spawning `{}`", command);

        let mut child = Command::new(&cmd.program)
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                command: command.clone(),
                source,
            })?;

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                return Err(CommandError::Io {
                    command,
                    output: Vec::new(),
                    source: std::io::Error::other("child output pipes were not captured"),
                })
            }
        };

        let mut lines = Vec::new();
        if let Err(source) = drain_combined(stdout, stderr, &mut lines).await {
            return Err(CommandError::Io {
                command,
                output: lines,
                source,
            });
        }

        let status = match child.wait().await {
            Ok(status) => status,
            Err(source) => {
                return Err(CommandError::Io {
                    command,
                    output: lines,
                    source,
                })
            }
        };

        if !status.success() {
            warn!("`{}` exited with {}", command, status);
            return Err(CommandError::Exit {
                command,
                code: status.code(),
                output: lines,
            });
        }

        debug!("`{}` produced {} lines of output", command, lines.len());
        Ok(lines)
    }
}

/// Read both pipes until EOF, appending lines in the order they arrive
async fn drain_combined<O, E>(stdout: O, stderr: E, lines: &mut Vec<String>) -> std::io::Result<()>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut stdout = BufReader::new(stdout).split(b'\n');
    let mut stderr = BufReader::new(stderr).split(b'\n');
    let mut stdout_open = true;
    let mut stderr_open = true;

    while stdout_open || stderr_open {
        tokio::select! {
            segment = stdout.next_segment(), if stdout_open => match segment? {
                Some(bytes) => lines.push(decode_line(&bytes)),
                None => stdout_open = false,
            },
            segment = stderr.next_segment(), if stderr_open => match segment? {
                Some(bytes) => lines.push(decode_line(&bytes)),
                None => stderr_open = false,
            },
        }
    }

    Ok(())
}

fn decode_line(bytes: &[u8]) -> String {
    let line = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(line).into_owned()
}
