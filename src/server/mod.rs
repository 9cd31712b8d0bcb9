//! Installer server - accepts provisioning requests over TCP
//!
//! Each `CreateCluster` request gets its own [`ActionContext`] and runs the
//! control-plane pipeline. `kubeadm init` cannot run twice at once on the
//! same node, so provisioning requests are serialized server-wide while
//! `Ping` is always answered immediately.

pub mod protocol;

use crate::core::{ActionContext, Cluster};
use crate::exec::{CommandRunner, HostRunner};
use crate::execution::ActionPipeline;
use crate::status::LogStatus;
use protocol::{InstallerRequest, ResponseData, ServerInfo, WireError, WireMessage};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Error types for the installer server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

// pause after a failed accept so fd exhaustion does not spin the loop
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Installer server state shared by all connections
pub struct InstallerServer {
    info: ServerInfo,
    runner: Arc<dyn CommandRunner>,
    provision_lock: Mutex<()>,
}

impl InstallerServer {
    /// Create a server that runs commands on the local host
    pub fn new(info: ServerInfo) -> Self {
        Self::with_runner(info, Arc::new(HostRunner::new()))
    }

    /// Create a server with a custom command runner
    pub fn with_runner(info: ServerInfo, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            info,
            runner,
            provision_lock: Mutex::new(()),
        }
    }

    /// Bind a listener on all interfaces at `port`
    pub async fn bind(port: &str) -> Result<TcpListener, ServerError> {
        let addr = format!("0.0.0.0:{}", port);
        TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Accept connections forever, one task per connection
    ///
    /// Accept errors are logged and the loop keeps running.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) {
        if let Ok(addr) = listener.local_addr() {
            info!("Installer server listening on {}", addr);
        }

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let server = Arc::clone(&self);
                    tokio::spawn(async move {
                        if let Err(e) = server.handle_connection(stream, peer).await {
                            warn!("Connection from {} ended with error: {}", peer, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                }
            }
        }
    }

    async fn handle_connection(&self, stream: TcpStream, peer: SocketAddr) -> std::io::Result<()> {
        debug!("Accepted connection from {}", peer);
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<InstallerRequest>(&line) {
                Ok(request) => {
                    info!("Received {} from {}", request.label(), peer);
                    self.handle_request(request).await
                }
                Err(e) => {
                    warn!("Malformed request from {}: {}", peer, e);
                    WireMessage::Error(WireError::new(format!("invalid request: {}", e)))
                }
            };

            let mut payload = serde_json::to_vec(&response).map_err(std::io::Error::other)?;
            payload.push(b'\n');
            writer.write_all(&payload).await?;
            writer.flush().await?;
        }

        debug!("Connection from {} closed", peer);
        Ok(())
    }

    /// Handle a single decoded request
    pub async fn handle_request(&self, request: InstallerRequest) -> WireMessage {
        match request {
            InstallerRequest::Ping => WireMessage::Ok(ResponseData::Info(self.info.clone())),
            InstallerRequest::CreateCluster { cluster } => self.create_cluster(cluster).await,
        }
    }

    async fn create_cluster(&self, cluster: Cluster) -> WireMessage {
        let _guard = self.provision_lock.lock().await;

        let status = Arc::new(LogStatus::new());
        let ctx = ActionContext::new(cluster, status, Arc::clone(&self.runner));
        let pipeline = ActionPipeline::control_plane();

        match pipeline.run(&ctx).await {
            Ok(()) => {
                info!("Cluster {} provisioned ({})", ctx.cluster.name, ctx.run_id);
                WireMessage::Ok(ResponseData::Unit)
            }
            Err(e) => {
                error!("Provisioning cluster {} failed: {}", ctx.cluster.name, e);
                let mut chain = e.chain().into_iter();
                WireMessage::Error(WireError {
                    message: chain.next().unwrap_or_default(),
                    causes: chain.collect(),
                })
            }
        }
    }
}
