//! CLI argument assembly and top-level parser.

use clap::{Args, Parser, Subcommand};
use netswitch_switch::SwitchOverrides;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use netswitch_node_core::args::{LogArgs, RootArgs};
use netswitch_node_core::version;

/// netswitch - switch a node between networks
#[derive(Debug, Parser)]
#[command(
    author,
    version = version::SHORT_VERSION,
    long_version = version::LONG_VERSION.as_str(),
    about,
    long_about = None
)]
pub struct Cli {
    /// Logging configuration.
    #[command(flatten)]
    pub logs: LogArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect or change the node's selected network.
    Network(NetworkArgs),
}

/// Arguments for the 'network' command.
#[derive(Debug, Args)]
pub struct NetworkArgs {
    #[command(subcommand)]
    pub command: NetworkCommands,
}

/// Network subcommands.
#[derive(Debug, Subcommand)]
pub enum NetworkCommands {
    /// Switch the node to another network.
    Switch(SwitchArgs),
    /// Show the selected network and the networks available in the config.
    Show(ShowArgs),
}

/// Arguments every network subcommand accepts.
#[derive(Debug, Args, Clone, Default)]
pub struct CommonArgs {
    /// Node root configuration.
    #[command(flatten)]
    pub root: RootArgs,

    /// Tool config file (TOML).
    ///
    /// Defaults to `netswitch.toml` in the platform config directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for 'network switch'.
#[derive(Debug, Args)]
pub struct SwitchArgs {
    /// Network to switch to, as named under `network_overrides`.
    #[arg(value_name = "NETWORK")]
    pub network: String,

    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Don't ask running node services to stop first.
    #[arg(long)]
    pub no_stop: bool,
}

/// Arguments for 'network show'.
#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Explicit values that take precedence over defaults and retained settings.
#[derive(Debug, Args, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[command(next_help_heading = "Overrides")]
#[serde(default)]
pub struct OverrideArgs {
    /// Introducer host for the full node and wallet.
    #[arg(long, value_name = "HOST")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introducer: Option<String>,

    /// DNS introducer host for the full node and wallet.
    #[arg(long, value_name = "HOST")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_introducer: Option<String>,

    /// Seeder bootstrap peer.
    #[arg(long, value_name = "HOST")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_peer: Option<String>,

    /// Full node port.
    #[arg(long, value_name = "PORT")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_node_port: Option<u16>,
}

impl OverrideArgs {
    /// Fill unset fields from `fallback`.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            introducer: self.introducer.or(fallback.introducer),
            dns_introducer: self.dns_introducer.or(fallback.dns_introducer),
            bootstrap_peer: self.bootstrap_peer.or(fallback.bootstrap_peer),
            full_node_port: self.full_node_port.or(fallback.full_node_port),
        }
    }
}

impl From<OverrideArgs> for SwitchOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            introducer: args.introducer,
            dns_introducer: args.dns_introducer,
            bootstrap_peer: args.bootstrap_peer,
            full_node_port: args.full_node_port,
        }
    }
}
