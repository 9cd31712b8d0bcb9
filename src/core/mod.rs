//! Core domain models
//!
//! Cluster addressing, the action context handed to every action, installer
//! configuration and well-known constants.

pub mod config;
pub mod constants;
pub mod context;

pub use config::InstallerConfig;
pub use context::*;
