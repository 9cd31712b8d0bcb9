//! installer - single-node Kubernetes provisioning with kubeadm

pub mod actions;
pub mod cli;
pub mod core;
pub mod exec;
pub mod execution;
pub mod kubeconfig;
pub mod server;
pub mod status;

// Re-export commonly used types
pub use crate::actions::{Action, ActionError, KubeadmInitAction};
pub use crate::core::{ActionContext, Cluster, InstallerConfig};
pub use crate::exec::{Cmd, CommandError, CommandRunner, HostRunner};
pub use crate::execution::{ActionPipeline, PipelineEvent};
pub use crate::kubeconfig::KubeconfigError;
pub use crate::status::{LogStatus, StatusReporter, StatusScope};
