use assert_matches::assert_matches;
use async_trait::async_trait;
use netswitch_config::{ConfigDocument, ConfigError, ConfigPath, OverrideTable, Peer};
use netswitch_node_core::dirs::NodeRoot;
use netswitch_rpc::{DaemonControl, DaemonError, DaemonRpc, DaemonRpcConfig, RetryPolicy};
use netswitch_switch::{
    CacheFile, NetworkSwitcher, RetainedSettings, RetentionError, StopOutcome, SwitchError,
    SwitchLayout, SwitchOptions, SwitchOverrides,
};
use serde::de::DeserializeOwned;
use std::{
    fs, io,
    path::Path,
    sync::atomic::{AtomicBool, AtomicU32, Ordering},
    time::Duration,
};
use tempfile::TempDir;
use tokio::net::TcpListener;

const CONFIG: &str = r#"
selected_network: mainnet
network_overrides:
  constants:
    mainnet:
      GENESIS_CHALLENGE: ccd5bb71183532bff220ba46c268991a3ff07eb358e8255a65c30a2dce0e5fbb
    testnet11:
      GENESIS_CHALLENGE: 37a90eb5185a9c4439a91ddc98bbadce7b4feba060d50116a067de66bf236615
    orphan: {}
  config:
    mainnet:
      address_prefix: xch
    testnet11:
      address_prefix: txch
      default_full_node_port: 58445
farmer:
  full_node_peers:
    - host: localhost
      port: 8444
full_node:
  port: 8444
  database_path: db/blockchain_v2_CHALLENGE.sqlite
  peers_file_path: db/peers.dat
  dns_servers:
    - dns-introducer.chia.net
    - chia.ctrlaltdel.ch
  full_node_peers:
    - host: trusted.example.com
      port: 8444
  introducer_peer:
    host: introducer.chia.net
    port: 8444
introducer:
  port: 8444
seeder:
  port: 8444
  other_peers_port: 8444
  bootstrap_peers:
    - node.chia.net
  static_peers: []
timelord:
  full_node_peers:
    - host: localhost
      port: 8444
wallet:
  dns_servers:
    - dns-introducer.chia.net
  full_node_peers:
    - host: localhost
      port: 8444
  introducer_peer:
    host: introducer.chia.net
    port: 8444
  wallet_peers_file_path: wallet/db/wallet_peers.dat
"#;

fn refused(endpoint: &str) -> DaemonError {
    DaemonError::Connect {
        endpoint: endpoint.to_owned(),
        source: io::Error::from(io::ErrorKind::ConnectionRefused),
    }
}

#[derive(Default)]
struct FakeDaemon {
    running: AtomicBool,
    reject: bool,
    exit_requests: AtomicU32,
}

impl FakeDaemon {
    fn running() -> Self {
        Self {
            running: AtomicBool::new(true),
            ..Default::default()
        }
    }

    fn rejecting() -> Self {
        Self {
            running: AtomicBool::new(true),
            reject: true,
            ..Default::default()
        }
    }

    fn exit_requests(&self) -> u32 {
        self.exit_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DaemonControl for FakeDaemon {
    fn endpoint(&self) -> String {
        "localhost:55400".to_owned()
    }

    async fn request_exit(&self) -> Result<(), DaemonError> {
        self.exit_requests.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            return Err(DaemonError::Rejected {
                endpoint: self.endpoint(),
                reason: "wallet busy".to_owned(),
            });
        }
        if self.running.swap(false, Ordering::SeqCst) {
            Ok(())
        } else {
            Err(refused(&self.endpoint()))
        }
    }

    async fn probe(&self) -> Result<(), DaemonError> {
        if self.running.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(refused(&self.endpoint()))
        }
    }
}

struct Node {
    _dir: TempDir,
    root: NodeRoot,
}

impl Node {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = NodeRoot::new(dir.path());
        fs::create_dir_all(root.path().join("config")).unwrap();
        fs::create_dir_all(root.db_dir()).unwrap();
        fs::write(root.config_file(), CONFIG).unwrap();
        Self { _dir: dir, root }
    }

    fn layout(&self) -> SwitchLayout {
        SwitchLayout::new(self.root.clone())
    }

    fn options(&self) -> SwitchOptions {
        let mut options = SwitchOptions::new(self.root.clone());
        options.stop_wait = RetryPolicy::new(2, Duration::from_millis(1));
        options
    }

    fn doc(&self) -> ConfigDocument {
        ConfigDocument::load(self.root.config_file()).unwrap()
    }

    fn field<T: DeserializeOwned>(&self, path: &str) -> T {
        self.doc()
            .get_as(&ConfigPath::parse(path).unwrap())
            .unwrap()
            .unwrap_or_else(|| panic!("{path} missing"))
    }

    fn set_field<T: serde::Serialize>(&self, path: &str, value: T) {
        let mut doc = self.doc();
        doc.set(&ConfigPath::parse(path).unwrap(), value).unwrap();
        doc.save().unwrap();
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.root.resolve(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn read(&self, path: &Path) -> Option<String> {
        fs::read_to_string(path).ok()
    }
}

#[tokio::test]
async fn switch_to_testnet_uses_profile_port() {
    let node = Node::new();
    let daemon = FakeDaemon::default();
    let switcher = NetworkSwitcher::new(node.options(), &daemon);

    let report = switcher.switch("testnet11").await.unwrap();

    assert_eq!(report.previous, "mainnet");
    assert_eq!(report.selected, "testnet11");
    assert_eq!(report.service, Some(StopOutcome::NotRunning));
    assert!(!report.restored_settings);
    assert_eq!(report.full_node_port, 58445);
    assert_eq!(daemon.exit_requests(), 1);

    let local = vec![Peer::localhost(58445)];
    assert_eq!(node.field::<String>("selected_network"), "testnet11");
    for port in [
        "full_node.port",
        "full_node.introducer_peer.port",
        "introducer.port",
        "seeder.port",
        "seeder.other_peers_port",
        "wallet.introducer_peer.port",
    ] {
        assert_eq!(node.field::<u16>(port), 58445, "{port}");
    }
    assert_eq!(node.field::<Vec<Peer>>("farmer.full_node_peers"), local);
    assert_eq!(node.field::<Vec<Peer>>("timelord.full_node_peers"), local);
    assert_eq!(node.field::<Vec<Peer>>("wallet.full_node_peers"), local);
    assert!(node.field::<Vec<Peer>>("full_node.full_node_peers").is_empty());
    assert_eq!(
        node.field::<String>("full_node.introducer_peer.host"),
        "introducer-testnet11.chia.net"
    );
    assert_eq!(
        node.field::<String>("wallet.introducer_peer.host"),
        "introducer-testnet11.chia.net"
    );
    assert_eq!(
        node.field::<Vec<String>>("full_node.dns_servers"),
        vec!["dns-introducer-testnet11.chia.net"]
    );
    assert_eq!(
        node.field::<Vec<String>>("wallet.dns_servers"),
        vec!["dns-introducer-testnet11.chia.net"]
    );
    assert_eq!(
        node.field::<Vec<String>>("seeder.bootstrap_peers"),
        vec!["node-testnet11.chia.net"]
    );
    assert_eq!(
        node.field::<String>("full_node.database_path"),
        "db/blockchain_v2_testnet11.sqlite"
    );
    assert_eq!(
        node.field::<String>("full_node.peers_file_path"),
        "db/peers-testnet11.dat"
    );
    assert_eq!(
        node.field::<String>("wallet.wallet_peers_file_path"),
        "wallet/db/wallet_peers-testnet11.dat"
    );

    let layout = node.layout();
    assert!(layout.archive_dir("mainnet").is_dir());
    assert!(layout.archive_dir("testnet11").is_dir());
    let saved = RetainedSettings::load(&layout.settings_file("mainnet"))
        .unwrap()
        .unwrap();
    assert_eq!(
        saved.dns_servers,
        vec!["dns-introducer.chia.net", "chia.ctrlaltdel.ch"]
    );
    assert_eq!(
        saved.full_node_peers,
        vec![Peer::new("trusted.example.com", 8444)]
    );
}

#[tokio::test]
async fn round_trip_restores_settings() {
    let node = Node::new();
    node.set_field("seeder.static_peers", vec!["static.example.com"]);
    node.set_field(
        "wallet.full_node_peers",
        vec![Peer::new("wallet-node.example.com", 8444)],
    );
    let before = RetainedSettings::capture(&node.doc()).unwrap();

    let daemon = FakeDaemon::default();
    let switcher = NetworkSwitcher::new(node.options(), &daemon);
    switcher.switch("testnet11").await.unwrap();

    node.set_field("full_node.dns_servers", vec!["dns.testnet.example.com"]);
    let report = switcher.switch("mainnet").await.unwrap();

    assert!(report.restored_settings);
    assert_eq!(report.full_node_port, 8444);
    assert_eq!(RetainedSettings::capture(&node.doc()).unwrap(), before);
    assert_eq!(node.field::<String>("selected_network"), "mainnet");
    assert_eq!(
        node.field::<String>("full_node.introducer_peer.host"),
        "introducer.chia.net"
    );

    let testnet = RetainedSettings::load(&node.layout().settings_file("testnet11"))
        .unwrap()
        .unwrap();
    assert_eq!(testnet.dns_servers, vec!["dns.testnet.example.com"]);

    let report = switcher.switch("testnet11").await.unwrap();
    assert!(report.restored_settings);
    assert_eq!(
        node.field::<Vec<String>>("wallet.dns_servers"),
        vec!["dns.testnet.example.com"]
    );
}

#[tokio::test]
async fn same_network_changes_nothing() {
    let node = Node::new();
    let daemon = FakeDaemon::running();
    let switcher = NetworkSwitcher::new(node.options(), &daemon);

    let err = switcher.switch("mainnet").await.unwrap_err();

    assert_matches!(&err, SwitchError::SameNetwork(network) if network == "mainnet");
    assert!(err.is_precondition());
    assert_eq!(fs::read_to_string(node.root.config_file()).unwrap(), CONFIG);
    assert!(!node.layout().archive_dir("mainnet").exists());
    assert_eq!(daemon.exit_requests(), 0);
}

#[tokio::test]
async fn unknown_network_changes_nothing() {
    let node = Node::new();
    let daemon = FakeDaemon::default();
    let switcher = NetworkSwitcher::new(node.options(), &daemon);

    assert_matches!(
        switcher.switch("testnet99").await,
        Err(SwitchError::UnknownNetwork { table: OverrideTable::Constants, .. })
    );
    assert_matches!(
        switcher.switch("orphan").await,
        Err(SwitchError::UnknownNetwork { table: OverrideTable::Config, .. })
    );
    assert_matches!(
        switcher.switch("../etc").await,
        Err(SwitchError::InvalidNetworkName(_))
    );

    assert_eq!(fs::read_to_string(node.root.config_file()).unwrap(), CONFIG);
    assert!(!node.layout().archive_dir("mainnet").exists());
    assert_eq!(daemon.exit_requests(), 0);
}

#[tokio::test]
async fn relocates_cache_files() {
    let node = Node::new();
    let layout = node.layout();
    node.write("db/sub-epoch-summaries", "mainnet ses");
    node.write("db/height-to-hash", "mainnet h2h");
    node.write("db/mainnet/height-to-hash", "stale mainnet h2h");
    node.write("db/testnet11/height-to-hash", "testnet h2h");

    let daemon = FakeDaemon::default();
    let report = NetworkSwitcher::new(node.options(), &daemon)
        .switch("testnet11")
        .await
        .unwrap();

    assert_eq!(report.relocated.len(), 3);
    assert_eq!(
        node.read(&layout.archived("mainnet", CacheFile::SubEpochSummaries)).as_deref(),
        Some("mainnet ses")
    );
    assert_eq!(
        node.read(&layout.archived("mainnet", CacheFile::HeightToHash)).as_deref(),
        Some("mainnet h2h")
    );
    assert_eq!(
        node.read(&layout.active(CacheFile::HeightToHash)).as_deref(),
        Some("testnet h2h")
    );
    assert!(!layout.active(CacheFile::SubEpochSummaries).exists());
    assert!(!layout.archived("testnet11", CacheFile::HeightToHash).exists());
}

#[tokio::test]
async fn explicit_port_wins() {
    let node = Node::new();
    let daemon = FakeDaemon::default();

    NetworkSwitcher::new(node.options(), &daemon)
        .switch("testnet11")
        .await
        .unwrap();
    let overrides = SwitchOverrides {
        introducer: Some("intro.example.com".to_owned()),
        full_node_port: Some(9999),
        ..Default::default()
    };
    NetworkSwitcher::new(node.options().with_overrides(overrides.clone()), &daemon)
        .switch("mainnet")
        .await
        .unwrap();
    let report = NetworkSwitcher::new(node.options().with_overrides(overrides), &daemon)
        .switch("testnet11")
        .await
        .unwrap();

    assert!(report.restored_settings);
    assert_eq!(report.full_node_port, 9999);
    assert_eq!(node.field::<u16>("full_node.port"), 9999);
    assert_eq!(node.field::<u16>("seeder.other_peers_port"), 9999);
    assert_eq!(
        node.field::<Vec<Peer>>("farmer.full_node_peers"),
        vec![Peer::localhost(9999)]
    );
    assert_eq!(
        node.field::<String>("wallet.introducer_peer.host"),
        "intro.example.com"
    );
}

#[tokio::test]
async fn stops_running_services() {
    let node = Node::new();
    let daemon = FakeDaemon::running();

    let report = NetworkSwitcher::new(node.options(), &daemon)
        .switch("testnet11")
        .await
        .unwrap();

    assert_eq!(report.service, Some(StopOutcome::Stopped));
    assert_eq!(daemon.exit_requests(), 1);
}

#[tokio::test]
async fn skips_service_check() {
    let node = Node::new();
    let daemon = FakeDaemon::running();

    let report = NetworkSwitcher::new(node.options().with_service_check(false), &daemon)
        .switch("testnet11")
        .await
        .unwrap();

    assert_eq!(report.service, None);
    assert_eq!(daemon.exit_requests(), 0);
}

#[tokio::test]
async fn stop_failure_leaves_config() {
    let node = Node::new();
    node.write("db/height-to-hash", "mainnet h2h");
    let daemon = FakeDaemon::rejecting();

    let err = NetworkSwitcher::new(node.options(), &daemon)
        .switch("testnet11")
        .await
        .unwrap_err();

    assert_matches!(err, SwitchError::StopDaemon { source: DaemonError::Rejected { .. }, .. });
    assert_eq!(node.field::<String>("selected_network"), "mainnet");
    assert_eq!(
        node.read(&node.layout().active(CacheFile::HeightToHash)).as_deref(),
        Some("mainnet h2h")
    );
}

#[tokio::test]
async fn removes_stale_peer_caches() {
    let node = Node::new();
    node.write("db/peers.dat", "");
    node.write("wallet/db/wallet_peers.dat", "");
    node.write("db/peers-testnet11.dat", "");

    let daemon = FakeDaemon::default();
    let report = NetworkSwitcher::new(node.options(), &daemon)
        .switch("testnet11")
        .await
        .unwrap();

    assert_eq!(report.removed_peer_files.len(), 2);
    assert!(!node.root.resolve("db/peers.dat").exists());
    assert!(!node.root.resolve("wallet/db/wallet_peers.dat").exists());
    assert!(node.root.resolve("db/peers-testnet11.dat").exists());
}

#[tokio::test]
async fn failed_move_reports_completed_moves() {
    let node = Node::new();
    let layout = node.layout();
    node.write("db/sub-epoch-summaries", "mainnet ses");
    node.write("db/height-to-hash", "mainnet h2h");
    // A non-empty directory where the archived file should go cannot be replaced.
    node.write("db/mainnet/height-to-hash/blocker", "");

    let daemon = FakeDaemon::default();
    let err = NetworkSwitcher::new(node.options(), &daemon)
        .switch("testnet11")
        .await
        .unwrap_err();

    assert_matches!(
        &err,
        SwitchError::Interrupted { completed, source, .. }
            if completed.len() == 1 && matches!(**source, SwitchError::Relocate { .. })
    );
    assert!(!err.is_precondition());
    assert_eq!(node.field::<String>("selected_network"), "mainnet");
    assert_eq!(
        node.read(&layout.archived("mainnet", CacheFile::SubEpochSummaries)).as_deref(),
        Some("mainnet ses")
    );
}

#[tokio::test]
async fn failed_save_after_move_is_interrupted() {
    let node = Node::new();
    let layout = node.layout();
    node.write("db/height-to-hash", "mainnet h2h");
    // A directory where the temporary config file goes makes the save fail.
    fs::create_dir_all(node.root.resolve("config/config.yaml.tmp")).unwrap();

    let daemon = FakeDaemon::default();
    let err = NetworkSwitcher::new(node.options(), &daemon)
        .switch("testnet11")
        .await
        .unwrap_err();

    assert_matches!(
        &err,
        SwitchError::Interrupted { current, target, completed, source }
            if current == "mainnet"
                && target == "testnet11"
                && completed.len() == 1
                && matches!(**source, SwitchError::Config(ConfigError::Write { .. }))
    );
    assert_eq!(node.field::<String>("selected_network"), "mainnet");
    assert!(!layout.active(CacheFile::HeightToHash).exists());
    assert_eq!(
        node.read(&layout.archived("mainnet", CacheFile::HeightToHash)).as_deref(),
        Some("mainnet h2h")
    );
}

#[tokio::test]
async fn malformed_retained_settings_abort_before_moves() {
    let node = Node::new();
    let layout = node.layout();
    node.write("db/height-to-hash", "mainnet h2h");
    node.write("db/testnet11/height-to-hash", "testnet h2h");
    node.write("db/testnet11/settings.json", "{\"dns_servers\": [");

    let daemon = FakeDaemon::running();
    let err = NetworkSwitcher::new(node.options(), &daemon)
        .switch("testnet11")
        .await
        .unwrap_err();

    assert_matches!(err, SwitchError::Retention(RetentionError::Parse { .. }));
    assert_eq!(daemon.exit_requests(), 0);
    assert_eq!(node.field::<String>("selected_network"), "mainnet");
    assert_eq!(
        node.read(&layout.active(CacheFile::HeightToHash)).as_deref(),
        Some("mainnet h2h")
    );
    assert_eq!(
        node.read(&layout.archived("testnet11", CacheFile::HeightToHash)).as_deref(),
        Some("testnet h2h")
    );
    assert!(!layout.archived("mainnet", CacheFile::HeightToHash).exists());
}

#[tokio::test]
async fn fills_empty_sections() {
    let node = Node::new();
    let config = CONFIG.replace("introducer:\n  port: 8444\n", "introducer:\n");
    assert_ne!(config, CONFIG);
    fs::write(node.root.config_file(), config).unwrap();

    let daemon = FakeDaemon::default();
    NetworkSwitcher::new(node.options(), &daemon)
        .switch("testnet11")
        .await
        .unwrap();

    assert_eq!(node.field::<u16>("introducer.port"), 58445);
}

#[tokio::test]
async fn running_daemon_blocks_switch_while_full_node_is_down() {
    let node = Node::new();
    node.write("db/height-to-hash", "mainnet h2h");

    // Only the daemon listens; the full node RPC port is closed.
    let daemon_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let daemon_port = daemon_listener.local_addr().unwrap().port();
    let rpc_port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    node.set_field("self_hostname", "127.0.0.1");
    node.set_field("daemon_port", daemon_port);
    node.set_field("full_node.rpc_port", rpc_port);

    let config =
        DaemonRpcConfig::from_document(&node.doc(), &node.root, Duration::from_secs(2)).unwrap();
    let err = NetworkSwitcher::new(node.options(), DaemonRpc::new(config))
        .switch("testnet11")
        .await
        .unwrap_err();

    let expected = format!("127.0.0.1:{daemon_port}");
    assert_matches!(
        &err,
        SwitchError::StopDaemon { endpoint, source }
            if *endpoint == expected && !source.is_connection_refused()
    );
    assert_eq!(node.field::<String>("selected_network"), "mainnet");
    assert_eq!(
        node.read(&node.layout().active(CacheFile::HeightToHash)).as_deref(),
        Some("mainnet h2h")
    );
    drop(daemon_listener);
}
