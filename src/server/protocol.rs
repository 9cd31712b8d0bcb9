//! Wire protocol for the installer server
//!
//! ## Wire Format: NDJSON (Newline-Delimited JSON)
//!
//! Each message is a single JSON object terminated by `\n`. A client sends
//! one [`InstallerRequest`] per line and receives exactly one
//! [`WireMessage`] line in response.

use crate::core::Cluster;
use serde::{Deserialize, Serialize};

/// Requests the server accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "data")]
pub enum InstallerRequest {
    /// Health check; answered with the server settings
    Ping,

    /// Provision a single-node cluster on this host
    CreateCluster { cluster: Cluster },
}

impl InstallerRequest {
    pub fn label(&self) -> &'static str {
        match self {
            InstallerRequest::Ping => "Ping",
            InstallerRequest::CreateCluster { .. } => "CreateCluster",
        }
    }
}

/// Settings the server was started with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub image: String,
    pub registry: String,
    pub wait_secs: u64,
    pub port: String,
}

/// Payload of a successful response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseData {
    Unit,
    Info(ServerInfo),
}

/// Failure description sent to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    /// Top-level message
    pub message: String,

    /// Underlying causes, outermost first
    #[serde(default)]
    pub causes: Vec<String>,
}

impl WireError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
        }
    }
}

/// One response line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data")]
pub enum WireMessage {
    Ok(ResponseData),
    Error(WireError),
}
