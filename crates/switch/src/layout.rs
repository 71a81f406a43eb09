//! Filesystem layout of network-scoped files under the node root.

use netswitch_node_core::dirs::NodeRoot;
use std::{fmt, path::PathBuf};

/// Name of the retained settings sidecar in each network's archive directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Cache files that belong to one network and are swapped on switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheFile {
    SubEpochSummaries,
    HeightToHash,
}

impl CacheFile {
    /// Every cache file, in relocation order.
    pub const ALL: [Self; 2] = [Self::SubEpochSummaries, Self::HeightToHash];

    /// File name, both in `db/` and in `db/<network>/`.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::SubEpochSummaries => "sub-epoch-summaries",
            Self::HeightToHash => "height-to-hash",
        }
    }
}

impl fmt::Display for CacheFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Paths the switch reads and writes, relative to a node root.
///
/// ```text
/// <root>/db/sub-epoch-summaries            active cache files
/// <root>/db/height-to-hash
/// <root>/db/<network>/sub-epoch-summaries  archived cache files
/// <root>/db/<network>/height-to-hash
/// <root>/db/<network>/settings.json        retained settings
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchLayout {
    root: NodeRoot,
}

impl SwitchLayout {
    /// Layout for the given node root.
    pub fn new(root: NodeRoot) -> Self {
        Self { root }
    }

    /// The node root.
    pub fn root(&self) -> &NodeRoot {
        &self.root
    }

    /// `<root>/db/<network>`
    pub fn archive_dir(&self, network: &str) -> PathBuf {
        self.root.db_dir().join(network)
    }

    /// `<root>/db/<network>/settings.json`
    pub fn settings_file(&self, network: &str) -> PathBuf {
        self.archive_dir(network).join(SETTINGS_FILE_NAME)
    }

    /// `<root>/db/<file>`
    pub fn active(&self, file: CacheFile) -> PathBuf {
        self.root.db_dir().join(file.file_name())
    }

    /// `<root>/db/<network>/<file>`
    pub fn archived(&self, network: &str, file: CacheFile) -> PathBuf {
        self.archive_dir(network).join(file.file_name())
    }
}
