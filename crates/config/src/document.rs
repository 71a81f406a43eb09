//! In-memory config document with path-addressable access.

use crate::{
    ConfigError, ConfigPath, FieldUpdate, NetworkConfig, NetworkConstants, NetworkProfile,
    OverrideTable,
};
use netswitch_node_core::fs::write_atomic;
use serde::{Serialize, de::DeserializeOwned};
use serde_yaml::{Mapping, Value};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Top-level key naming the active network.
pub const SELECTED_NETWORK_KEY: &str = "selected_network";

/// Top-level key holding the per-network override tables.
pub const NETWORK_OVERRIDES_KEY: &str = "network_overrides";

/// The node configuration, loaded from and saved back to a YAML file.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    root: Value,
}

impl ConfigDocument {
    /// Load the document at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parse `content` as the document that lives at `path`.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, ConfigError> {
        let path = path.into();
        let root: Value = serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        if !root.is_mapping() {
            return Err(ConfigError::RootNotMapping(path));
        }
        Ok(Self { path, root })
    }

    /// The file this document is saved to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the value at `path`, if every segment exists.
    pub fn get(&self, path: &ConfigPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.root, |node, segment| node.as_mapping()?.get(segment.as_str()))
    }

    /// Returns the value at `path` decoded as `T`.
    ///
    /// Absent and `null` fields both yield `None`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &ConfigPath) -> Result<Option<T>, ConfigError> {
        match self.get(path) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_yaml::from_value(value.clone())
                .map(Some)
                .map_err(|source| ConfigError::Decode {
                    path: path.clone(),
                    source,
                }),
        }
    }

    /// Store `value` at `path`, creating missing intermediate mappings.
    pub fn set<T: Serialize>(&mut self, path: &ConfigPath, value: T) -> Result<(), ConfigError> {
        let value = serde_yaml::to_value(value).map_err(|source| ConfigError::Serialize {
            path: path.to_string(),
            source,
        })?;
        self.set_value(path, value)
    }

    /// Store a raw YAML value at `path`, creating missing intermediate mappings.
    pub fn set_value(&mut self, path: &ConfigPath, value: Value) -> Result<(), ConfigError> {
        let Some((last, parents)) = path.segments().split_last() else {
            return Err(ConfigError::InvalidPath(path.to_string()));
        };

        let mut node = &mut self.root;
        let mut walked = "<root>";
        for segment in parents {
            // An empty section (`introducer:` with no body) reads as null.
            if node.is_null() {
                *node = Value::Mapping(Mapping::new());
            }
            node = match node {
                Value::Mapping(map) => map
                    .entry(Value::String(segment.clone()))
                    .or_insert(Value::Mapping(Mapping::new())),
                _ => {
                    return Err(ConfigError::NotAMapping {
                        path: path.clone(),
                        segment: walked.to_string(),
                    });
                }
            };
            walked = segment.as_str();
        }

        if node.is_null() {
            *node = Value::Mapping(Mapping::new());
        }
        match node {
            Value::Mapping(map) => {
                map.insert(Value::String(last.clone()), value);
                Ok(())
            }
            _ => Err(ConfigError::NotAMapping {
                path: path.clone(),
                segment: walked.to_string(),
            }),
        }
    }

    /// Apply staged updates in order. Stops at the first failure.
    pub fn apply(&mut self, updates: &[FieldUpdate]) -> Result<(), ConfigError> {
        for update in updates {
            debug!(path = %update.path, "setting config path");
            self.set_value(&update.path, update.value.clone())?;
        }
        Ok(())
    }

    /// Persist the document to [`path`](Self::path).
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&self.path)
    }

    /// Persist the document to `path` with a durable replace.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(&self.root).map_err(|source| {
            ConfigError::Serialize {
                path: "<root>".to_string(),
                source,
            }
        })?;
        write_atomic(path, content.as_bytes()).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// The currently selected network name.
    pub fn selected_network(&self) -> Result<String, ConfigError> {
        let path = ConfigPath::parse(SELECTED_NETWORK_KEY)?;
        self.get_as(&path)?.ok_or(ConfigError::Missing(path))
    }

    /// Path of `network`'s entry in the given override table.
    pub fn override_path(table: OverrideTable, network: &str) -> Result<ConfigPath, ConfigError> {
        ConfigPath::from_segments([NETWORK_OVERRIDES_KEY, table.key(), network])
    }

    /// Whether `network` has an entry in `table`.
    pub fn has_override(&self, table: OverrideTable, network: &str) -> Result<bool, ConfigError> {
        Ok(self.get(&Self::override_path(table, network)?).is_some())
    }

    /// `network_overrides.constants.<network>`, if present.
    pub fn network_constants(
        &self,
        network: &str,
    ) -> Result<Option<NetworkConstants>, ConfigError> {
        self.get_as(&Self::override_path(OverrideTable::Constants, network)?)
    }

    /// `network_overrides.config.<network>`, if present.
    pub fn network_config(&self, network: &str) -> Result<Option<NetworkConfig>, ConfigError> {
        self.get_as(&Self::override_path(OverrideTable::Config, network)?)
    }

    /// The full profile for `network`, if both override tables contain it.
    pub fn network_profile(&self, network: &str) -> Result<Option<NetworkProfile>, ConfigError> {
        let (Some(constants), Some(config)) =
            (self.network_constants(network)?, self.network_config(network)?)
        else {
            return Ok(None);
        };
        Ok(Some(NetworkProfile {
            name: network.to_string(),
            config,
            constants,
        }))
    }

    /// Every network named in either override table, sorted.
    pub fn network_names(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for table in OverrideTable::ALL {
            let Ok(path) = ConfigPath::from_segments([NETWORK_OVERRIDES_KEY, table.key()]) else {
                continue;
            };
            if let Some(Value::Mapping(entries)) = self.get(&path) {
                names.extend(entries.keys().filter_map(|k| k.as_str().map(str::to_string)));
            }
        }
        names.into_iter().collect()
    }
}
