//! CLI interface
//!
//! Command-line surface for the `nucleon` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Nucleon: request orchestration core for the scientific copilot platform
#[derive(Debug, Parser)]
#[command(name = "nucleon", version, about)]
pub struct Cli {
    /// Path to a config file (defaults to ~/.nucleon/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the orchestration HTTP server
    Serve,

    /// Check configuration, credentials, and store reachability
    Doctor,
}
