//! The network switch itself.

use crate::{
    CacheFile, DEFAULT_DOMAIN, MoveOutcome, NetworkDefaults, Relocation, RetainedSettings,
    RetentionError, ServiceGuard, StopOutcome, SwitchError, SwitchLayout, SwitchOverrides,
    move_and_overwrite, remove_file_if_exists,
};
use netswitch_config::{ConfigDocument, ConfigPath, OverrideTable};
use netswitch_node_core::dirs::NodeRoot;
use netswitch_rpc::{DaemonControl, RetryPolicy};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};
use tracing::{debug, error, info, warn};

/// Config fields naming peer caches that are discarded on switch.
const PEER_CACHE_FIELDS: [&str; 2] = ["full_node.peers_file_path", "wallet.wallet_peers_file_path"];

/// Everything a switch needs besides the target name.
#[derive(Debug, Clone)]
pub struct SwitchOptions {
    /// Node root holding `config/config.yaml` and `db/`.
    pub root: NodeRoot,
    /// Base domain for fallback introducer hosts.
    pub domain: String,
    /// Explicit operator values.
    pub overrides: SwitchOverrides,
    /// Stop running services before touching their files.
    pub verify_service_stopped: bool,
    /// How long to wait for services to exit.
    pub stop_wait: RetryPolicy,
}

impl SwitchOptions {
    /// Options with default domain, no overrides, and the service check enabled.
    pub fn new(root: NodeRoot) -> Self {
        Self {
            root,
            domain: DEFAULT_DOMAIN.to_owned(),
            overrides: SwitchOverrides::default(),
            verify_service_stopped: true,
            stop_wait: RetryPolicy::default(),
        }
    }

    /// Set the operator overrides.
    pub fn with_overrides(mut self, overrides: SwitchOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Set whether running services are stopped first.
    pub fn with_service_check(mut self, verify: bool) -> Self {
        self.verify_service_stopped = verify;
        self
    }
}

/// What a completed switch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchReport {
    /// Network selected before the switch.
    pub previous: String,
    /// Network selected now.
    pub selected: String,
    /// Service check result, if it ran.
    pub service: Option<StopOutcome>,
    /// Whether retained settings for `selected` were found and applied.
    pub restored_settings: bool,
    /// Cache files that were moved.
    pub relocated: Vec<Relocation>,
    /// Full node port now configured.
    pub full_node_port: u16,
    /// Stale peer caches that were deleted.
    pub removed_peer_files: Vec<PathBuf>,
}

/// Switches the selected network of one node root.
#[derive(Debug)]
pub struct NetworkSwitcher<D> {
    options: SwitchOptions,
    layout: SwitchLayout,
    guard: ServiceGuard<D>,
}

impl<D: DaemonControl> NetworkSwitcher<D> {
    /// Create a switcher that stops services through `daemon`.
    pub fn new(options: SwitchOptions, daemon: D) -> Self {
        let layout = SwitchLayout::new(options.root.clone());
        let guard = ServiceGuard::new(daemon, options.stop_wait);
        Self {
            options,
            layout,
            guard,
        }
    }

    /// Load the root's config and switch it to `target`.
    pub async fn switch(&self, target: &str) -> Result<SwitchReport, SwitchError> {
        let config_file = self.layout.root().config_file();
        debug!(path = %config_file.display(), "loading config");
        let doc = ConfigDocument::load(config_file).map_err(SwitchError::LoadConfig)?;
        self.switch_document(doc, target).await
    }

    /// Switch an already loaded config to `target`.
    ///
    /// Preconditions are checked before anything is written. The updated
    /// config is saved as soon as the cache files are in place; if that save
    /// or a cache move fails after another move succeeded, the result is
    /// [`SwitchError::Interrupted`].
    pub async fn switch_document(
        &self,
        mut doc: ConfigDocument,
        target: &str,
    ) -> Result<SwitchReport, SwitchError> {
        info!(network = target, "swapping to network");

        let current = doc.selected_network()?;
        debug!(network = %current, "current network");

        if current == target {
            return Err(SwitchError::SameNetwork(current));
        }
        validate_network_name(&current)?;
        validate_network_name(target)?;
        for table in OverrideTable::ALL {
            if !doc.has_override(table, target)? {
                return Err(SwitchError::UnknownNetwork {
                    network: target.to_owned(),
                    table,
                });
            }
        }
        let profile = doc
            .network_profile(target)?
            .ok_or_else(|| SwitchError::UnknownNetwork {
                network: target.to_owned(),
                table: OverrideTable::Config,
            })?;

        for network in [current.as_str(), target] {
            let dir = self.layout.archive_dir(network);
            fs::create_dir_all(&dir).map_err(|source| SwitchError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            debug!(path = %dir.display(), "ensured cache directory");
        }

        let outgoing = RetainedSettings::capture(&doc).map_err(RetentionError::Capture)?;
        outgoing.save(&self.layout.settings_file(&current))?;
        let incoming = RetainedSettings::load(&self.layout.settings_file(target))?;
        if incoming.is_some() {
            info!(network = target, "restoring retained settings");
        }

        let service = if self.options.verify_service_stopped {
            let outcome =
                self.guard
                    .stop_if_running()
                    .await
                    .map_err(|source| SwitchError::StopDaemon {
                        endpoint: self.guard.daemon().endpoint(),
                        source,
                    })?;
            Some(outcome)
        } else {
            debug!("skipping service check");
            None
        };

        let stale_peer_files = PEER_CACHE_FIELDS
            .iter()
            .map(|field| doc.get_as::<String>(&ConfigPath::parse(field)?))
            .collect::<Result<Vec<_>, _>>()?;

        let defaults = NetworkDefaults::resolve(
            target,
            &self.options.domain,
            &profile.config,
            incoming.as_ref(),
            &self.options.overrides,
        );
        doc.apply(&defaults.field_updates()?)?;

        let mut relocated = Vec::new();
        for relocation in self.cache_plan(&current, target) {
            match move_and_overwrite(&relocation.from, &relocation.to) {
                Ok(MoveOutcome::Moved) => relocated.push(relocation),
                Ok(MoveOutcome::SourceMissing) => {}
                Err(source) => {
                    let err = SwitchError::Relocate { relocation, source };
                    return Err(interrupted(&current, target, relocated, err));
                }
            }
        }

        if let Err(e) = doc.save() {
            return Err(interrupted(&current, target, relocated, e.into()));
        }
        debug!(path = %doc.path().display(), "saved config");

        let fresh = [defaults.peers_file_path(), defaults.wallet_peers_file_path()];
        let removed_peer_files = self.remove_stale_peer_files(&stale_peer_files, &fresh);

        info!(
            previous = %current,
            network = target,
            port = defaults.full_node_port,
            "network switch complete"
        );

        Ok(SwitchReport {
            previous: current,
            selected: target.to_owned(),
            service,
            restored_settings: incoming.is_some(),
            relocated,
            full_node_port: defaults.full_node_port,
            removed_peer_files,
        })
    }

    /// Archive `current`'s cache files, then activate `target`'s.
    fn cache_plan(&self, current: &str, target: &str) -> Vec<Relocation> {
        let archive = CacheFile::ALL.into_iter().map(|file| {
            Relocation::new(self.layout.active(file), self.layout.archived(current, file))
        });
        let activate = CacheFile::ALL.into_iter().map(|file| {
            Relocation::new(self.layout.archived(target, file), self.layout.active(file))
        });
        archive.chain(activate).collect()
    }

    /// Delete peer caches the old config pointed at, unless still in use.
    /// Failures are logged and otherwise ignored.
    fn remove_stale_peer_files(&self, stale: &[Option<String>], fresh: &[String]) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        for path in stale.iter().flatten() {
            if path.is_empty() || fresh.contains(path) {
                continue;
            }
            let path = self.layout.root().resolve(path);
            match remove_file_if_exists(&path) {
                Ok(true) => {
                    debug!(path = %path.display(), "deleted peer cache");
                    removed.push(path);
                }
                Ok(false) => {}
                Err(e) => warn!(path = %path.display(), %e, "could not delete peer cache"),
            }
        }
        removed
    }
}

fn interrupted(
    current: &str,
    target: &str,
    completed: Vec<Relocation>,
    source: SwitchError,
) -> SwitchError {
    if completed.is_empty() {
        return source;
    }
    error!(
        %current,
        %target,
        moved = completed.len(),
        "cache files moved but config not updated"
    );
    SwitchError::Interrupted {
        current: current.to_owned(),
        target: target.to_owned(),
        completed,
        source: Box::new(source),
    }
}

/// Network names become directory names under `db/`.
fn validate_network_name(name: &str) -> Result<(), SwitchError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == name => Ok(()),
        _ => Err(SwitchError::InvalidNetworkName(name.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_names() {
        assert!(validate_network_name("testnet11").is_ok());
        assert!(validate_network_name("mainnet").is_ok());
        for bad in ["", ".", "..", "a/b", "/abs", "../x", "a/"] {
            assert!(validate_network_name(bad).is_err(), "{bad:?}");
        }
    }
}
