//! Kubeconfig export - copies the node's admin kubeconfig to a local path
//! with the API server endpoint rewritten to an externally reachable address.

use crate::core::constants::ADMIN_KUBECONFIG_PATH;
use crate::exec::{Cmd, CommandError, CommandRunner};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Error types for kubeconfig export
#[derive(Debug, Error)]
pub enum KubeconfigError {
    #[error("failed to get kubeconfig from node")]
    Read(#[source] CommandError),

    #[error("kubeconfig destination path is empty")]
    EmptyDestination,

    #[error("failed to create kubeconfig output directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write kubeconfig to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// matches kubeconfig server entries like:
//    server: https://172.17.0.2:6443
// indentation and port are ASCII only
static SERVER_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?-u:\s)+server:) https://.*:[0-9]+$")
        .expect("server address pattern is valid")
});

/// Join host and port, bracketing IPv6 literals (`[::1]:6443`)
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// Rewrite the `server:` entry of a kubeconfig to `https://host:port`.
///
/// Every other line is copied verbatim. Each output line ends with `\n`,
/// including the last one.
pub fn rewrite_server_address<I, S>(lines: I, host: &str, port: u16) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let addr = join_host_port(host, port);
    let mut buff = String::new();

    for line in lines {
        let line = line.as_ref();
        match SERVER_ADDRESS_RE.captures(line) {
            Some(caps) => {
                buff.push_str(&caps[1]);
                buff.push_str(" https://");
                buff.push_str(&addr);
            }
            None => buff.push_str(line),
        }
        buff.push('\n');
    }

    buff
}

/// Fetch the admin kubeconfig through `runner` and write it to `dest` with
/// the server entry pointing at `host:port`.
///
/// The parent directory of `dest` is created (0755) when missing. The file
/// is written owner read/write only, replacing any existing file.
pub async fn write_kubeconfig(
    runner: &dyn CommandRunner,
    dest: &Path,
    host: &str,
    port: u16,
) -> Result<(), KubeconfigError> {
    if dest.as_os_str().is_empty() {
        return Err(KubeconfigError::EmptyDestination);
    }

    let cmd = Cmd::new("cat").arg(ADMIN_KUBECONFIG_PATH);
    let lines = runner
        .combined_output_lines(&cmd)
        .await
        .map_err(KubeconfigError::Read)?;
    debug!("Read {} kubeconfig lines from node", lines.len());

    let contents = rewrite_server_address(&lines, host, port);

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_output_dir(parent).await?;
    }
    write_private_file(dest, contents.as_bytes()).await?;

    info!(
        "Wrote kubeconfig to {} (server https://{})",
        dest.display(),
        join_host_port(host, port)
    );
    Ok(())
}

// 0755 matches client-go's kubeconfig directory handling
async fn create_output_dir(dir: &Path) -> Result<(), KubeconfigError> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);

    builder
        .create(dir)
        .await
        .map_err(|source| KubeconfigError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}

/// Temporary sibling of `dest` used while writing
fn temp_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    dest.with_file_name(name)
}

// a failed write leaves any existing file at `dest` untouched
async fn write_private_file(dest: &Path, contents: &[u8]) -> Result<(), KubeconfigError> {
    let temp = temp_path(dest);
    let result = write_and_rename(&temp, dest, contents).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&temp).await;
    }
    result.map_err(|source| KubeconfigError::Write {
        path: dest.to_path_buf(),
        source,
    })
}

async fn write_and_rename(temp: &Path, dest: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(temp).await?;

    // mode() only applies on creation, a stale temp file keeps its old mode
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
    }

    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(temp, dest).await
}
