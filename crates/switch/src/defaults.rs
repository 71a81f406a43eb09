//! Network-specific config values and their precedence.

use crate::RetainedSettings;
use netswitch_config::{ConfigError, FieldUpdate, NetworkConfig, Peer, SELECTED_NETWORK_KEY};

/// Name of the production network.
pub const MAINNET: &str = "mainnet";

/// Base domain of the fallback introducer and DNS introducer hosts.
pub const DEFAULT_DOMAIN: &str = "chia.net";

/// Full node port used on mainnet when the profile does not set one.
pub const MAINNET_FULL_NODE_PORT: u16 = 8444;

/// Full node port used on every other network when the profile does not set one.
pub const TESTNET_FULL_NODE_PORT: u16 = 58444;

/// Explicit values supplied by the operator for a single switch.
///
/// Empty strings and a zero port count as not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchOverrides {
    /// Introducer host for the full node and wallet.
    pub introducer: Option<String>,
    /// Single DNS introducer for the full node and wallet.
    pub dns_introducer: Option<String>,
    /// Single seeder bootstrap peer.
    pub bootstrap_peer: Option<String>,
    /// Full node port.
    pub full_node_port: Option<u16>,
}

impl SwitchOverrides {
    fn introducer(&self) -> Option<&str> {
        non_empty(self.introducer.as_deref())
    }

    fn dns_introducer(&self) -> Option<&str> {
        non_empty(self.dns_introducer.as_deref())
    }

    fn bootstrap_peer(&self) -> Option<&str> {
        non_empty(self.bootstrap_peer.as_deref())
    }

    fn full_node_port(&self) -> Option<u16> {
        self.full_node_port.filter(|port| *port != 0)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Every network-specific value written on switch.
///
/// Built up in precedence order, each step overriding the last:
/// [`fallback`](Self::fallback), [`with_profile`](Self::with_profile),
/// [`with_retained`](Self::with_retained), [`with_overrides`](Self::with_overrides).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDefaults {
    pub network: String,
    pub full_node_port: u16,
    pub introducer_host: String,
    pub dns_servers: Vec<String>,
    pub bootstrap_peers: Vec<String>,
    pub static_peers: Vec<String>,
    pub full_node_peers: Vec<Peer>,
    pub wallet_full_node_peers: Vec<Peer>,
}

impl NetworkDefaults {
    /// Values derived from the network name alone.
    pub fn fallback(network: &str, domain: &str) -> Self {
        let (full_node_port, introducer_host, dns_server, bootstrap_peer) = if network == MAINNET
        {
            (
                MAINNET_FULL_NODE_PORT,
                format!("introducer.{domain}"),
                format!("dns-introducer.{domain}"),
                format!("node.{domain}"),
            )
        } else {
            (
                TESTNET_FULL_NODE_PORT,
                format!("introducer-{network}.{domain}"),
                format!("dns-introducer-{network}.{domain}"),
                format!("node-{network}.{domain}"),
            )
        };

        Self {
            network: network.to_owned(),
            full_node_port,
            introducer_host,
            dns_servers: vec![dns_server],
            bootstrap_peers: vec![bootstrap_peer],
            static_peers: Vec::new(),
            full_node_peers: Vec::new(),
            wallet_full_node_peers: Vec::new(),
        }
    }

    /// Apply the target's `network_overrides.config` entry.
    pub fn with_profile(mut self, profile: &NetworkConfig) -> Self {
        if profile.default_full_node_port != 0 {
            self.full_node_port = profile.default_full_node_port;
        }
        self
    }

    /// Apply settings retained from the last time the target was active.
    /// Empty lists keep the current value.
    pub fn with_retained(mut self, retained: &RetainedSettings) -> Self {
        fn replace_if_set<T: Clone>(current: &mut Vec<T>, retained: &[T]) {
            if !retained.is_empty() {
                *current = retained.to_vec();
            }
        }

        replace_if_set(&mut self.dns_servers, &retained.dns_servers);
        replace_if_set(&mut self.bootstrap_peers, &retained.bootstrap_peers);
        replace_if_set(&mut self.static_peers, &retained.static_peers);
        replace_if_set(&mut self.full_node_peers, &retained.full_node_peers);
        replace_if_set(&mut self.wallet_full_node_peers, &retained.wallet_full_node_peers);
        self
    }

    /// Apply explicit operator values.
    pub fn with_overrides(mut self, overrides: &SwitchOverrides) -> Self {
        if let Some(host) = overrides.introducer() {
            self.introducer_host = host.to_owned();
        }
        if let Some(dns) = overrides.dns_introducer() {
            self.dns_servers = vec![dns.to_owned()];
        }
        if let Some(peer) = overrides.bootstrap_peer() {
            self.bootstrap_peers = vec![peer.to_owned()];
        }
        if let Some(port) = overrides.full_node_port() {
            self.full_node_port = port;
        }
        self
    }

    /// The full precedence chain for `network`.
    pub fn resolve(
        network: &str,
        domain: &str,
        profile: &NetworkConfig,
        retained: Option<&RetainedSettings>,
        overrides: &SwitchOverrides,
    ) -> Self {
        let defaults = Self::fallback(network, domain).with_profile(profile);
        let defaults = match retained {
            Some(retained) => defaults.with_retained(retained),
            None => defaults,
        };
        defaults.with_overrides(overrides)
    }

    fn is_mainnet(&self) -> bool {
        self.network == MAINNET
    }

    /// The local full node as a peer.
    pub fn local_peer(&self) -> Peer {
        Peer::localhost(self.full_node_port)
    }

    /// Wallet peers, falling back to the local full node.
    pub fn wallet_peers(&self) -> Vec<Peer> {
        if self.wallet_full_node_peers.is_empty() {
            vec![self.local_peer()]
        } else {
            self.wallet_full_node_peers.clone()
        }
    }

    /// `db/blockchain_v2_<network>.sqlite`
    pub fn database_path(&self) -> String {
        format!("db/blockchain_v2_{}.sqlite", self.network)
    }

    /// Full node peer cache, relative to the node root.
    pub fn peers_file_path(&self) -> String {
        if self.is_mainnet() {
            "db/peers.dat".to_owned()
        } else {
            format!("db/peers-{}.dat", self.network)
        }
    }

    /// Wallet peer cache, relative to the node root.
    pub fn wallet_peers_file_path(&self) -> String {
        if self.is_mainnet() {
            "wallet/db/wallet_peers.dat".to_owned()
        } else {
            format!("wallet/db/wallet_peers-{}.dat", self.network)
        }
    }

    /// Every config field to write, in document order.
    pub fn field_updates(&self) -> Result<Vec<FieldUpdate>, ConfigError> {
        let port = self.full_node_port;
        let local = vec![self.local_peer()];

        Ok(vec![
            FieldUpdate::new(SELECTED_NETWORK_KEY, &self.network)?,
            FieldUpdate::new("farmer.full_node_peers", &local)?,
            FieldUpdate::new("full_node.database_path", self.database_path())?,
            FieldUpdate::new(RetainedSettings::DNS_SERVERS, &self.dns_servers)?,
            FieldUpdate::new("full_node.peers_file_path", self.peers_file_path())?,
            FieldUpdate::new("full_node.port", port)?,
            FieldUpdate::new(RetainedSettings::FULL_NODE_PEERS, &self.full_node_peers)?,
            FieldUpdate::new("full_node.introducer_peer.host", &self.introducer_host)?,
            FieldUpdate::new("full_node.introducer_peer.port", port)?,
            FieldUpdate::new("introducer.port", port)?,
            FieldUpdate::new("seeder.port", port)?,
            FieldUpdate::new("seeder.other_peers_port", port)?,
            FieldUpdate::new(RetainedSettings::BOOTSTRAP_PEERS, &self.bootstrap_peers)?,
            FieldUpdate::new(RetainedSettings::STATIC_PEERS, &self.static_peers)?,
            FieldUpdate::new("timelord.full_node_peers", &local)?,
            FieldUpdate::new("wallet.dns_servers", &self.dns_servers)?,
            FieldUpdate::new(RetainedSettings::WALLET_FULL_NODE_PEERS, self.wallet_peers())?,
            FieldUpdate::new("wallet.introducer_peer.host", &self.introducer_host)?,
            FieldUpdate::new("wallet.introducer_peer.port", port)?,
            FieldUpdate::new("wallet.wallet_peers_file_path", self.wallet_peers_file_path())?,
        ])
    }
}
