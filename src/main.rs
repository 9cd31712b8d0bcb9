use installer::actions::ActionError;
use installer::cli::commands::{InitCommand, ServeCommand};
use installer::cli::output::{format_output, format_pipeline_event, style, CHECK, CROSS, INFO};
use installer::cli::status::SpinnerStatus;
use installer::cli::{Cli, Command};
use installer::core::{ActionContext, InstallerConfig};
use installer::exec::HostRunner;
use installer::execution::ActionPipeline;
use installer::server::protocol::ServerInfo;
use installer::server::InstallerServer;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let mut config = match &cli.config {
        Some(path) => InstallerConfig::from_file(path)
            .with_context(|| format!("Failed to load installer config from {}", path))?,
        None => InstallerConfig::default(),
    };

    match &cli.command {
        Command::Serve(cmd) => serve(cmd, &mut config).await?,
        Command::Init(cmd) => init(cmd, &mut config).await?,
    }

    Ok(())
}

async fn serve(cmd: &ServeCommand, config: &mut InstallerConfig) -> Result<()> {
    cmd.apply(config);
    config.validate().context("Invalid installer configuration")?;

    let listener = InstallerServer::bind(&config.port).await?;
    let server = Arc::new(InstallerServer::new(ServerInfo {
        image: config.image.clone(),
        registry: config.registry.clone(),
        wait_secs: config.wait_secs,
        port: config.port.clone(),
    }));

    server.serve(listener).await;
    Ok(())
}

async fn init(cmd: &InitCommand, config: &mut InstallerConfig) -> Result<()> {
    cmd.apply(config);
    let cluster = config.cluster.clone();

    println!(
        "{} Kubeconfig will be written to {}",
        INFO,
        style(cluster.kubeconfig_path.display()).cyan()
    );

    let ctx = ActionContext::new(
        cluster,
        Arc::new(SpinnerStatus::new()),
        Arc::new(HostRunner::new()),
    );

    let mut pipeline = ActionPipeline::control_plane();
    pipeline.add_event_handler(|event| {
        if let Some(line) = format_pipeline_event(event) {
            println!("{}", line);
        }
    });

    match pipeline.run(&ctx).await {
        Ok(()) => {
            println!(
                "\n{} {} is ready, API server at {}",
                CHECK,
                style(&ctx.cluster.name).bold(),
                style(ctx.cluster.api_server_address()).cyan()
            );
            Ok(())
        }
        Err(e) => {
            println!(
                "\n{} {} {}",
                CROSS,
                style(&ctx.cluster.name).bold(),
                style("failed").red()
            );
            if let ActionError::Command { source, .. } = &e {
                if !source.output().is_empty() {
                    println!("{}", format_output(source.output(), 20));
                }
            }
            error!("{}", e.chain().join(": "));
            std::process::exit(1);
        }
    }
}
