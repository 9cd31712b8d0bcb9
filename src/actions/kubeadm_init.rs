//! kubeadm init - bootstraps the control plane and exports its kubeconfig

use crate::actions::{Action, ActionError};
use crate::core::constants::{API_SERVER_PORT, KUBEADM_CONFIG_PATH};
use crate::core::ActionContext;
use crate::exec::Cmd;
use crate::kubeconfig::write_kubeconfig;
use crate::status::StatusScope;
use async_trait::async_trait;
use tracing::{error, info};

const INIT_FAILED: &str = "failed to init node with kubeadm";

/// Runs `kubeadm init` on the control-plane node, then writes a kubeconfig
/// pointing at the cluster's externally reachable API server address to
/// `ctx.cluster.kubeconfig_path`.
#[derive(Debug, Clone, Default)]
pub struct KubeadmInitAction;

impl KubeadmInitAction {
    pub fn new() -> Self {
        Self
    }

    /// The `kubeadm init` invocation for the control-plane node
    pub fn init_command() -> Cmd {
        Cmd::new("kubeadm").args([
            "init".to_string(),
            // preflight errors are expected, swap being enabled in particular
            "--ignore-preflight-errors=all".to_string(),
            format!("--config={}", KUBEADM_CONFIG_PATH),
            "--skip-token-print".to_string(),
            "--v=6".to_string(),
        ])
    }
}

#[async_trait]
impl Action for KubeadmInitAction {
    fn name(&self) -> &'static str {
        "kubeadm-init"
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        let status = StatusScope::start(ctx.status.as_ref(), "Starting control-plane");

        let cmd = Self::init_command();
        let result = ctx.runner.combined_output_lines(&cmd).await;
        let output = match &result {
            Ok(lines) => lines.as_slice(),
            Err(e) => e.output(),
        };
        info!("{}", output.join("\n"));

        if let Err(source) = result {
            error!("{}", source);
            return Err(ActionError::Command {
                context: INIT_FAILED,
                source,
            });
        }

        let address = ctx.cluster.api_server_address();
        if let Err(source) = write_kubeconfig(
            ctx.runner.as_ref(),
            &ctx.cluster.kubeconfig_path,
            address,
            API_SERVER_PORT,
        )
        .await
        {
            error!("{}", source);
            return Err(ActionError::Kubeconfig {
                context: INIT_FAILED,
                source,
            });
        }

        status.succeed();
        Ok(())
    }
}
