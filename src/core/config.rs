//! Installer configuration from YAML

use crate::core::constants::{DEFAULT_PORT, DEFAULT_REGISTRY};
use crate::core::Cluster;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level installer configuration
///
/// Every field is optional in the file; command-line flags override what
/// the file provides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Node image used for booting the cluster
    #[serde(default)]
    pub image: String,

    /// Kubernetes image registry
    #[serde(default = "default_registry")]
    pub registry: String,

    /// How long to wait for the control plane to become ready (seconds)
    #[serde(default)]
    pub wait_secs: u64,

    /// Listening port of the installer server
    #[serde(default = "default_port")]
    pub port: String,

    /// Cluster defaults used by the one-shot `init` command
    #[serde(default)]
    pub cluster: Cluster,
}

fn default_registry() -> String {
    DEFAULT_REGISTRY.to_string()
}

fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            image: String::new(),
            registry: default_registry(),
            wait_secs: 0,
            port: default_port(),
            cluster: Cluster::default(),
        }
    }
}

impl InstallerConfig {
    /// Load installer configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse installer configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: InstallerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the installer configuration
    pub fn validate(&self) -> Result<()> {
        if self.port.is_empty() {
            anyhow::bail!("Port must not be empty");
        }
        self.port_number()?;
        Ok(())
    }

    /// The listening port as a number
    pub fn port_number(&self) -> Result<u16> {
        self.port
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("Invalid port '{}': {}", self.port, e))
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }
}
