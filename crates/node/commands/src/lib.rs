//! CLI commands for netswitch.
//!
//! This crate provides the command-line interface:
//! - [`Cli`] - Top-level CLI parser
//! - [`Commands`] - Available subcommands
//! - [`ToolConfig`] - Tool settings shared by every command
//!
//! Configuration is loaded using Figment with the following priority
//! (highest wins):
//!
//! 1. CLI arguments
//! 2. Config file (TOML)
//! 3. Environment variables (`NETSWITCH_` prefix, `__` between sections)
//! 4. Defaults

mod cli;
pub mod commands;
pub mod config;

pub use cli::{
    Cli, Commands, CommonArgs, NetworkArgs, NetworkCommands, OverrideArgs, ShowArgs, SwitchArgs,
};
pub use config::{DaemonSettings, ToolConfig};

use clap::Parser;
use color_eyre::eyre;
use netswitch_node_core::{logging, version};
use tracing::debug;

/// Run netswitch with the process's command line arguments.
///
/// This is the main entry point that should be called from the binary.
pub async fn run() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(&cli.logs)?;

    debug!(version = version::SHORT_VERSION, sha = version::GIT_SHA, "netswitch");

    match cli.command {
        Commands::Network(args) => commands::network::run(args).await,
    }
}
