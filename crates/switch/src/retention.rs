//! Peer settings retained per network across switches.

use netswitch_config::{ConfigDocument, ConfigError, ConfigPath, Peer};
use netswitch_node_core::fs::write_atomic;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Error type for retained settings storage.
#[derive(Debug, thiserror::Error)]
pub enum RetentionError {
    /// The current peer settings could not be read from the config.
    #[error("error reading peer settings from config: {0}")]
    Capture(#[source] ConfigError),

    /// The snapshot could not be encoded.
    #[error("error marshalling retained settings: {0}")]
    Encode(#[source] serde_json::Error),

    /// The snapshot could not be written.
    #[error("error writing retained settings {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The snapshot exists but could not be read.
    #[error("error reading retained settings {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The snapshot exists but is not valid JSON of the expected shape.
    #[error("error parsing retained settings {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Peer settings an operator may have customized for one network.
///
/// Kept at `db/<network>/settings.json` while that network is inactive.
/// `null` lists (as written by older tools) read back as empty.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainedSettings {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub dns_servers: Vec<String>,

    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub bootstrap_peers: Vec<String>,

    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub static_peers: Vec<String>,

    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub full_node_peers: Vec<Peer>,

    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub wallet_full_node_peers: Vec<Peer>,
}

impl RetainedSettings {
    /// Config locations of each retained field.
    pub const DNS_SERVERS: &'static str = "full_node.dns_servers";
    pub const BOOTSTRAP_PEERS: &'static str = "seeder.bootstrap_peers";
    pub const STATIC_PEERS: &'static str = "seeder.static_peers";
    pub const FULL_NODE_PEERS: &'static str = "full_node.full_node_peers";
    pub const WALLET_FULL_NODE_PEERS: &'static str = "wallet.full_node_peers";

    /// Read the retained fields from the live config. Missing fields are empty.
    pub fn capture(doc: &ConfigDocument) -> Result<Self, ConfigError> {
        fn list<T: serde::de::DeserializeOwned>(
            doc: &ConfigDocument,
            path: &str,
        ) -> Result<Vec<T>, ConfigError> {
            Ok(doc.get_as(&ConfigPath::parse(path)?)?.unwrap_or_default())
        }

        Ok(Self {
            dns_servers: list(doc, Self::DNS_SERVERS)?,
            bootstrap_peers: list(doc, Self::BOOTSTRAP_PEERS)?,
            static_peers: list(doc, Self::STATIC_PEERS)?,
            full_node_peers: list(doc, Self::FULL_NODE_PEERS)?,
            wallet_full_node_peers: list(doc, Self::WALLET_FULL_NODE_PEERS)?,
        })
    }

    /// Write the snapshot to `path`, replacing any previous one.
    pub fn save(&self, path: &Path) -> Result<(), RetentionError> {
        let json = serde_json::to_vec_pretty(self).map_err(RetentionError::Encode)?;
        write_atomic(path, &json).map_err(|source| RetentionError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "saved retained settings");
        Ok(())
    }

    /// Read a snapshot from `path`. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>, RetentionError> {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no retained settings");
                return Ok(None);
            }
            Err(source) => {
                return Err(RetentionError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings = serde_json::from_slice(&content).map_err(|source| RetentionError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded retained settings");
        Ok(Some(settings))
    }
}
