//! Test utility functions for the installer
#![allow(dead_code)]

use installer::core::{ActionContext, Cluster};
use installer::exec::{Cmd, CommandError, CommandRunner};
use installer::status::StatusReporter;

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Admin kubeconfig as `kubeadm init` leaves it on the node
pub const ADMIN_KUBECONFIG: &[&str] = &[
    "apiVersion: v1",
    "clusters:",
    "- cluster:",
    "    certificate-authority-data: LS0tLS1CRUdJTiBDRVJUSUZJQ0FURS0tLS0t",
    "    server: https://172.17.0.2:6443",
    "  name: kubernetes",
    "contexts:",
    "- context:",
    "    cluster: kubernetes",
    "    user: kubernetes-admin",
    "  name: kubernetes-admin@kubernetes",
    "current-context: kubernetes-admin@kubernetes",
    "kind: Config",
];

/// Scripted reply for a program
#[derive(Debug, Clone)]
pub enum Reply {
    /// Exit 0 with these output lines
    Lines(Vec<String>),
    /// Exit with `code` after printing `output`
    Fail { code: i32, output: Vec<String> },
}

impl Reply {
    pub fn lines(lines: &[&str]) -> Self {
        Reply::Lines(lines.iter().map(|l| l.to_string()).collect())
    }

    pub fn fail(code: i32, output: &[&str]) -> Self {
        Reply::Fail {
            code,
            output: output.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Command runner that answers from a script and records every call
#[derive(Default)]
pub struct ScriptedRunner {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<Cmd>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to every invocation of `program` with `reply`
    pub fn on(mut self, program: &str, reply: Reply) -> Self {
        self.replies.insert(program.to_string(), reply);
        self
    }

    /// A node where `kubeadm init` succeeds and the admin kubeconfig is
    /// `kubeconfig`
    pub fn healthy_node(kubeconfig: &[&str]) -> Self {
        Self::new()
            .on("kubeadm", Reply::lines(&["[init] Using Kubernetes version: v1.14.0"]))
            .on("cat", Reply::lines(kubeconfig))
    }

    pub fn calls(&self) -> Vec<Cmd> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of invocations of `program`
    pub fn calls_to(&self, program: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.program == program)
            .count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn combined_output_lines(&self, cmd: &Cmd) -> Result<Vec<String>, CommandError> {
        self.calls.lock().unwrap().push(cmd.clone());

        match self.replies.get(&cmd.program) {
            Some(Reply::Lines(lines)) => Ok(lines.clone()),
            Some(Reply::Fail { code, output }) => Err(CommandError::Exit {
                command: cmd.command_line(),
                code: Some(*code),
                output: output.clone(),
            }),
            None => Err(CommandError::Spawn {
                command: cmd.command_line(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}

/// Status reporter that records start/end calls
#[derive(Default)]
pub struct RecordingStatus {
    events: Mutex<Vec<String>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl StatusReporter for RecordingStatus {
    fn start(&self, label: &str) {
        self.events.lock().unwrap().push(format!("start:{}", label));
    }

    fn end(&self, success: bool) {
        self.events.lock().unwrap().push(format!("end:{}", success));
    }
}

/// Build a context around the given test doubles
pub fn test_context(
    cluster: Cluster,
    runner: &Arc<ScriptedRunner>,
    status: &Arc<RecordingStatus>,
) -> ActionContext {
    ActionContext::new(cluster, status.clone(), runner.clone())
}

/// Read a file written by the installer
pub fn read_to_string(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}

/// Assert the file has owner read/write permission only
#[cfg(unix)]
pub fn assert_private_file(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600, "{} has mode {:o}", path.display(), mode);
}

#[cfg(not(unix))]
pub fn assert_private_file(_path: &Path) {}
