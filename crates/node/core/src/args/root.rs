//! Node root CLI arguments.

use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Node root directory configuration.
#[derive(Debug, Args, Clone, Default, Serialize, Deserialize)]
#[command(next_help_heading = "Root")]
#[serde(default)]
pub struct RootArgs {
    /// Node root directory (contains `config/`, `db/` and `wallet/`).
    ///
    /// Falls back to `CHIA_ROOT`, then `~/.chia/mainnet`.
    #[arg(long, value_name = "PATH")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}
