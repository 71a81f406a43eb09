//! Typed views of config document sections.

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::fmt;

/// Hostname used for peers on the local machine.
const LOCALHOST: &str = "localhost";

/// A `{host, port}` peer entry, as used by every `full_node_peers` list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
    pub host: String,
    pub port: u16,
}

impl Peer {
    /// Create a new peer entry.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// A peer on the local machine.
    pub fn localhost(port: u16) -> Self {
        Self::new(LOCALHOST, port)
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Per-network settings from `network_overrides.config.<name>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Bech32m prefix for addresses on this network.
    pub address_prefix: String,

    /// Full node port for this network; `0` means unset.
    pub default_full_node_port: u16,
}

/// Consensus constants from `network_overrides.constants.<name>`.
///
/// Opaque to netswitch: presence is checked, contents are passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkConstants(Mapping);

/// A selectable network: its name plus both override table entries.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkProfile {
    pub name: String,
    pub config: NetworkConfig,
    pub constants: NetworkConstants,
}

/// The two per-network tables under `network_overrides`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideTable {
    Constants,
    Config,
}

impl OverrideTable {
    /// Both tables, in lookup order.
    pub const ALL: [Self; 2] = [Self::Constants, Self::Config];

    /// Key of the table under `network_overrides`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Constants => "constants",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for OverrideTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
