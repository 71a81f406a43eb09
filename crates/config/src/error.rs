//! Error types for config document operations.

use crate::ConfigPath;
use std::{io, path::PathBuf};

/// Error type for [`ConfigDocument`](crate::ConfigDocument) operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file could not be written.
    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid YAML.
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The top level of the document is not a mapping.
    #[error("config {} does not contain a mapping at the top level", .0.display())]
    RootNotMapping(PathBuf),

    /// A value could not be converted to YAML.
    #[error("failed to serialize value for {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A dotted path string is malformed.
    #[error("invalid config path {0:?}")]
    InvalidPath(String),

    /// An intermediate node on the path exists but is not a mapping.
    #[error("cannot set {path}: {segment} is not a mapping")]
    NotAMapping { path: ConfigPath, segment: String },

    /// A field exists but does not have the expected shape.
    #[error("config field {path} has an unexpected shape: {source}")]
    Decode {
        path: ConfigPath,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required field is absent.
    #[error("config field {0} is missing")]
    Missing(ConfigPath),
}
