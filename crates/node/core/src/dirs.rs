//! Node root directory resolution.
//!
//! The node root holds `config/config.yaml`, the `db/` tree with the active
//! and archived cache files, and the `wallet/` tree.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DB_DIR_NAME, DEFAULT_ROOT_DIR, ROOT_ENV_VAR,
};
use directories::{BaseDirs, ProjectDirs};
use std::{
    env::VarError,
    path::{Path, PathBuf},
};

/// Errors resolving the node root.
#[derive(Debug, thiserror::Error)]
pub enum RootDirError {
    /// A user supplied path could not be shell-expanded.
    #[error("invalid path {path:?}: {source}")]
    Expand {
        path: String,
        #[source]
        source: shellexpand::LookupError<VarError>,
    },

    /// No explicit root was given and the home directory is unknown.
    #[error("could not determine home directory; pass --root or set CHIA_ROOT")]
    NoHome,
}

/// Returns the default project directories for netswitch itself.
pub fn default_project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("net", "netswitch", "netswitch")
}

/// Returns the default tool config file path.
pub fn default_config_file() -> Option<PathBuf> {
    default_project_dirs().map(|dirs| dirs.config_dir().join("netswitch.toml"))
}

/// Parses a user-given path, expanding `~` and environment variables.
pub fn parse_path(value: &str) -> Result<PathBuf, shellexpand::LookupError<VarError>> {
    shellexpand::full(value).map(|path| PathBuf::from(path.into_owned()))
}

/// Resolve the node root.
///
/// Resolution order: explicit path (CLI or tool config), then the
/// `CHIA_ROOT` environment variable, then `~/.chia/mainnet`.
pub fn resolve_root(explicit: Option<&Path>) -> Result<NodeRoot, RootDirError> {
    if let Some(path) = explicit {
        return expand(path).map(NodeRoot::new);
    }

    if let Some(env_root) = std::env::var_os(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
        return expand(Path::new(&env_root)).map(NodeRoot::new);
    }

    let home = BaseDirs::new().ok_or(RootDirError::NoHome)?;
    Ok(NodeRoot::new(home.home_dir().join(DEFAULT_ROOT_DIR)))
}

fn expand(path: &Path) -> Result<PathBuf, RootDirError> {
    let raw = path.to_string_lossy();
    parse_path(&raw).map_err(|source| RootDirError::Expand {
        path: raw.into_owned(),
        source,
    })
}

/// A resolved node root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRoot(PathBuf);

impl NodeRoot {
    /// Wrap an already resolved root path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Returns the root path.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// `<root>/config/config.yaml`
    pub fn config_file(&self) -> PathBuf {
        self.0.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
    }

    /// `<root>/db`
    pub fn db_dir(&self) -> PathBuf {
        self.0.join(DB_DIR_NAME)
    }

    /// Resolve a path stored in the node config, which is relative to the root
    /// unless it is absolute.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.0.join(relative)
    }
}

impl AsRef<Path> for NodeRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
