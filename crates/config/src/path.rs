//! Dotted config paths.

use crate::ConfigError;
use serde::Serialize;
use serde_yaml::Value;
use std::fmt;

/// A path into the config document, e.g. `full_node.introducer_peer.host`.
///
/// Always holds at least one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigPath(Vec<String>);

impl ConfigPath {
    /// Parse a dotted path.
    pub fn parse(dotted: &str) -> Result<Self, ConfigError> {
        Self::from_segments(dotted.split('.'))
            .map_err(|_| ConfigError::InvalidPath(dotted.to_string()))
    }

    /// Build a path from pre-split segments.
    ///
    /// Use this when a segment may itself contain a dot, such as a network
    /// name used as a map key.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::InvalidPath(segments.join(".")));
        }
        Ok(Self(segments))
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// A single staged write: one path and the value to store there.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub path: ConfigPath,
    pub value: Value,
}

impl FieldUpdate {
    /// Stage `value` for the dotted `path`.
    pub fn new<T: Serialize>(path: &str, value: T) -> Result<Self, ConfigError> {
        let value = serde_yaml::to_value(value).map_err(|source| ConfigError::Serialize {
            path: path.to_string(),
            source,
        })?;
        Ok(Self {
            path: ConfigPath::parse(path)?,
            value,
        })
    }
}
