//! Error types for network switching.

use crate::{Relocation, RetentionError};
use netswitch_config::{ConfigError, OverrideTable};
use netswitch_rpc::DaemonError;
use std::{io, path::PathBuf};

/// Error type for [`NetworkSwitcher`](crate::NetworkSwitcher).
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    /// The node config could not be loaded.
    #[error("error loading config: {0}")]
    LoadConfig(#[source] ConfigError),

    /// The target is already the selected network.
    #[error("current network name and new network name are the same: {0}")]
    SameNetwork(String),

    /// The target is missing from one of the override tables.
    #[error("network {network} does not exist in the config's network override {table}")]
    UnknownNetwork {
        network: String,
        table: OverrideTable,
    },

    /// A network name cannot be used as a directory name.
    #[error("network name {0:?} is not a valid directory name")]
    InvalidNetworkName(String),

    /// Reading or updating the config document failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A per-network archive directory could not be created.
    #[error("error creating cache file directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Retained settings could not be saved or restored.
    #[error(transparent)]
    Retention(#[from] RetentionError),

    /// The running node could not be stopped.
    #[error("error stopping node services at {endpoint}: {source}")]
    StopDaemon {
        endpoint: String,
        #[source]
        source: DaemonError,
    },

    /// A cache file move failed.
    #[error("error moving {} to {}: {source}", .relocation.from.display(), .relocation.to.display())]
    Relocate {
        relocation: Relocation,
        #[source]
        source: io::Error,
    },

    /// A failure after cache files were already moved.
    ///
    /// The active cache files may belong to `target` while `selected_network`
    /// still names `current`. Nothing is rolled back.
    #[error(
        "switch from {current} to {target} interrupted after moving {} cache file(s); \
         active cache files may not match selected_network: {source}",
        .completed.len()
    )]
    Interrupted {
        current: String,
        target: String,
        completed: Vec<Relocation>,
        #[source]
        source: Box<SwitchError>,
    },
}

impl SwitchError {
    /// Whether the switch was rejected before anything was modified.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::SameNetwork(_) | Self::UnknownNetwork { .. } | Self::InvalidNetworkName(_)
        )
    }
}
