//! Figment-based configuration loading.
//!
//! Configuration priority (highest wins):
//! 1. CLI arguments (applied after Figment load)
//! 2. Config file (TOML)
//! 3. Environment variables (`NETSWITCH_` prefix)
//! 4. Defaults

use crate::cli::OverrideArgs;
use eyre::{Result, WrapErr, bail};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use netswitch_node_core::{constants::ENV_PREFIX, dirs::default_config_file};
use netswitch_rpc::RetryPolicy;
use netswitch_switch::DEFAULT_DOMAIN;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Complete tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Node root override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Base domain for fallback introducer hosts.
    pub domain: String,

    /// Explicit switch values applied to every switch.
    pub switch: OverrideArgs,

    /// Node service control.
    pub daemon: DaemonSettings,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            root: None,
            domain: DEFAULT_DOMAIN.to_owned(),
            switch: OverrideArgs::default(),
            daemon: DaemonSettings::default(),
        }
    }
}

/// How the running node is asked to stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonSettings {
    /// Bound on each connect and request, in seconds.
    pub timeout_secs: u64,

    /// Checks for the node to exit before giving up.
    pub stop_attempts: u32,

    /// Backoff unit between checks, in seconds.
    pub backoff_secs: u64,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            stop_attempts: 5,
            backoff_secs: 1,
        }
    }
}

impl DaemonSettings {
    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Wait policy for the node to exit.
    pub fn stop_wait(&self) -> RetryPolicy {
        RetryPolicy::new(self.stop_attempts, Duration::from_secs(self.backoff_secs))
    }
}

impl ToolConfig {
    /// Load configuration from defaults, environment, and config file.
    ///
    /// An explicit `config_path` must exist; the default location is
    /// optional. CLI overrides should be applied separately after loading.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(path) if !path.exists() => {
                bail!("config file {} does not exist", path.display())
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_config_file().filter(|path| path.exists()),
        };

        let mut figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().wrap_err("failed to load configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ToolConfig::default();
        assert_eq!(config.domain, "chia.net");
        assert_eq!(config.root, None);
        assert_eq!(config.daemon.timeout(), Duration::from_secs(10));
        assert_eq!(
            config.daemon.stop_wait(),
            RetryPolicy::new(5, Duration::from_secs(1))
        );
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("netswitch.toml");

        fs::write(
            &config_path,
            r#"
domain = "example.org"
root = "/srv/node"

[switch]
full_node_port = 58445

[daemon]
stop_attempts = 2
"#,
        )
        .unwrap();

        let config = ToolConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config.domain, "example.org");
        assert_eq!(config.root, Some(PathBuf::from("/srv/node")));
        assert_eq!(config.switch.full_node_port, Some(58445));
        assert_eq!(config.switch.introducer, None);
        assert_eq!(config.daemon.stop_attempts, 2);
        assert_eq!(config.daemon.timeout_secs, 10);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        assert!(ToolConfig::load(Some(&config_path)).is_err());
    }
}
