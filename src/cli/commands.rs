//! CLI command definitions

use crate::core::InstallerConfig;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Start the installer server
#[derive(Debug, Args, Clone)]
pub struct ServeCommand {
    /// Node docker image to use for booting the cluster
    #[arg(long)]
    pub image: Option<String>,

    /// Kubernetes image registry
    #[arg(long)]
    pub registry: Option<String>,

    /// Wait for control plane node to be ready (e.g. 0s, 90s, 5m)
    #[arg(long, value_parser = parse_duration)]
    pub wait: Option<Duration>,

    /// Installer server port
    #[arg(long)]
    pub port: Option<String>,
}

impl ServeCommand {
    /// Override configuration values with the flags that were given
    pub fn apply(&self, config: &mut InstallerConfig) {
        if let Some(image) = &self.image {
            config.image = image.clone();
        }
        if let Some(registry) = &self.registry {
            config.registry = registry.clone();
        }
        if let Some(wait) = self.wait {
            config.wait_secs = wait.as_secs();
        }
        if let Some(port) = &self.port {
            config.port = port.clone();
        }
    }
}

/// Initialize a control-plane node on this host
#[derive(Debug, Args, Clone)]
pub struct InitCommand {
    /// Cluster name
    #[arg(long)]
    pub name: Option<String>,

    /// Externally reachable address of this node
    #[arg(long)]
    pub node_address: Option<String>,

    /// Load balancer address in front of the API server
    #[arg(long)]
    pub external_load_balancer: Option<String>,

    /// Where to write the kubeconfig (defaults to ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,
}

impl InitCommand {
    /// Override configuration values with the flags that were given
    pub fn apply(&self, config: &mut InstallerConfig) {
        let cluster = &mut config.cluster;
        if let Some(name) = &self.name {
            cluster.name = name.clone();
        }
        if let Some(address) = &self.node_address {
            cluster.node_address = address.clone();
        }
        if let Some(lb) = &self.external_load_balancer {
            cluster.external_load_balancer = lb.clone();
        }
        if let Some(path) = &self.kubeconfig {
            cluster.kubeconfig_path = path.clone();
        }
        if cluster.kubeconfig_path.as_os_str().is_empty() {
            if let Some(path) = default_kubeconfig_path() {
                cluster.kubeconfig_path = path;
            }
        }
    }
}

/// `~/.kube/config`, if a home directory is known
pub fn default_kubeconfig_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kube").join("config"))
}

/// Parse durations like `0s`, `90s`, `5m`, `1h` (bare numbers are seconds)
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let (digits, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => s.split_at(idx),
        None => (s, "s"),
    };
    let value: u64 = digits
        .parse()
        .map_err(|_| format!("Invalid duration: {}", s))?;

    let multiplier = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        _ => return Err(format!("Invalid duration unit in '{}' (expected s, m or h)", s)),
    };
    Ok(Duration::from_secs(value.saturating_mul(multiplier)))
}
