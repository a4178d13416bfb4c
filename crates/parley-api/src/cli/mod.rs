//! CLI command definitions for the `parley` binary.

pub mod check_config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Quota-gated chat relay between LINE and an LLM backend.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, env = "PARLEY_CONFIG", default_value = "parley.toml")]
    pub config: PathBuf,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the LINE webhook server.
    Serve {
        /// Address to bind (overrides `[server].host`).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides `[server].port`).
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Load and validate the configuration, then print the quota tiers.
    CheckConfig,
}
