//! Action context - the environment every action runs in

use crate::core::constants::DEFAULT_CLUSTER_NAME;
use crate::exec::CommandRunner;
use crate::status::StatusReporter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Addressing facts for the cluster being provisioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster name
    #[serde(default = "default_cluster_name")]
    pub name: String,

    /// Externally reachable address of the node
    #[serde(default)]
    pub node_address: String,

    /// Load balancer in front of the API server (empty when there is none)
    #[serde(default)]
    pub external_load_balancer: String,

    /// Where the rewritten kubeconfig is written
    #[serde(default)]
    pub kubeconfig_path: PathBuf,
}

fn default_cluster_name() -> String {
    DEFAULT_CLUSTER_NAME.to_string()
}

impl Cluster {
    pub fn new(node_address: impl Into<String>, kubeconfig_path: impl Into<PathBuf>) -> Self {
        Self {
            node_address: node_address.into(),
            kubeconfig_path: kubeconfig_path.into(),
            ..Self::default()
        }
    }

    pub fn with_external_load_balancer(mut self, address: impl Into<String>) -> Self {
        self.external_load_balancer = address.into();
        self
    }

    /// Address clients should use to reach the API server.
    ///
    /// The load balancer wins when set, otherwise the node address is used.
    pub fn api_server_address(&self) -> &str {
        if self.external_load_balancer.is_empty() {
            &self.node_address
        } else {
            &self.external_load_balancer
        }
    }
}

impl Default for Cluster {
    fn default() -> Self {
        Self {
            name: default_cluster_name(),
            node_address: String::new(),
            external_load_balancer: String::new(),
            kubeconfig_path: PathBuf::new(),
        }
    }
}

/// Execution environment for one pipeline run
///
/// Built fresh for each provisioning request and never shared between runs.
pub struct ActionContext {
    /// Unique id of this run, attached to log spans
    pub run_id: Uuid,

    pub cluster: Cluster,

    /// Progress reporting for the steps of this run
    pub status: Arc<dyn StatusReporter>,

    /// Runs external commands on the node
    pub runner: Arc<dyn CommandRunner>,
}

impl ActionContext {
    pub fn new(
        cluster: Cluster,
        status: Arc<dyn StatusReporter>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            cluster,
            status,
            runner,
        }
    }
}
