//! Command-line interface

pub mod commands;
pub mod output;
pub mod status;

use clap::{Parser, Subcommand};
use commands::{InitCommand, ServeCommand};
use std::ffi::OsString;

/// Single-node Kubernetes installer driving kubeadm
#[derive(Debug, Parser, Clone)]
#[command(name = "installer")]
#[command(author = "Installer Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Creates a local Kubernetes cluster", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to installer configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Start the installer server
    Serve(ServeCommand),

    /// Initialize a control-plane node on this host
    Init(InitCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
