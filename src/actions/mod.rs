//! Provisioning actions
//!
//! An [`Action`] is one step of cluster provisioning. Actions are built
//! fresh for every run, executed once against an [`ActionContext`] and then
//! dropped. New kinds of action implement the trait and are appended to an
//! [`ActionPipeline`](crate::execution::ActionPipeline).

pub mod kubeadm_init;

use crate::core::ActionContext;
use crate::exec::CommandError;
use crate::kubeconfig::KubeconfigError;
use async_trait::async_trait;
use thiserror::Error;

pub use kubeadm_init::KubeadmInitAction;

/// A single provisioning step
#[async_trait]
pub trait Action: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Run the action
    async fn execute(&self, ctx: &ActionContext) -> Result<(), ActionError>;
}

/// Error returned by an action
///
/// The message is the action-level context; the underlying failure is
/// available through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ActionError {
    /// An external command failed to start or exited non-zero
    #[error("{context}")]
    Command {
        context: &'static str,
        #[source]
        source: CommandError,
    },

    /// The kubeconfig could not be fetched or written
    #[error("{context}")]
    Kubeconfig {
        context: &'static str,
        #[source]
        source: KubeconfigError,
    },
}

impl ActionError {
    /// Messages of this error and every cause, outermost first
    pub fn chain(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            messages.push(err.to_string());
            source = std::error::Error::source(err);
        }
        messages
    }
}
