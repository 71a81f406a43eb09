//! Network commands - switch or inspect the selected network.

use crate::{
    cli::{CommonArgs, NetworkArgs, NetworkCommands, ShowArgs, SwitchArgs},
    config::ToolConfig,
};
use eyre::{Result, WrapErr};
use netswitch_config::ConfigDocument;
use netswitch_node_core::dirs::{NodeRoot, resolve_root};
use netswitch_rpc::{DaemonRpc, DaemonRpcConfig};
use netswitch_switch::{
    NetworkDefaults, NetworkSwitcher, StopOutcome, SwitchLayout, SwitchOptions, SwitchReport,
};
use tracing::{debug, info};

/// Run a network subcommand.
pub async fn run(args: NetworkArgs) -> Result<()> {
    match args.command {
        NetworkCommands::Switch(args) => switch(args).await,
        NetworkCommands::Show(args) => show(args),
    }
}

/// Load tool config and resolve the node root. `--root` beats the config file.
fn load(common: &CommonArgs) -> Result<(ToolConfig, NodeRoot)> {
    let config = ToolConfig::load(common.config.as_deref())?;
    let explicit = common.root.root.as_deref().or(config.root.as_deref());
    let root = resolve_root(explicit)?;
    debug!(root = %root.path().display(), "node root");
    Ok((config, root))
}

fn load_document(root: &NodeRoot) -> Result<ConfigDocument> {
    let path = root.config_file();
    ConfigDocument::load(&path).wrap_err_with(|| format!("failed to load {}", path.display()))
}

async fn switch(args: SwitchArgs) -> Result<()> {
    let (config, root) = load(&args.common)?;
    let doc = load_document(&root)?;

    let daemon = DaemonRpcConfig::from_document(&doc, &root, config.daemon.timeout())
        .wrap_err("invalid daemon settings")?;
    info!(endpoint = %daemon.endpoint(), "using daemon");

    let options = SwitchOptions {
        root,
        domain: config.domain,
        overrides: args.overrides.or(config.switch).into(),
        verify_service_stopped: !args.no_stop,
        stop_wait: config.daemon.stop_wait(),
    };

    let report = NetworkSwitcher::new(options, DaemonRpc::new(daemon))
        .switch_document(doc, &args.network)
        .await
        .wrap_err_with(|| format!("failed to switch to network {}", args.network))?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &SwitchReport) {
    match report.service {
        Some(StopOutcome::Stopped) => println!("Stopped running node services"),
        Some(StopOutcome::NotRunning) | None => {}
    }
    if report.restored_settings {
        println!("Restored previous settings for {}", report.selected);
    }
    for relocation in &report.relocated {
        println!(
            "Moved {} to {}",
            relocation.from.display(),
            relocation.to.display()
        );
    }
    println!(
        "Switched from {} to {} (full node port {})",
        report.previous, report.selected, report.full_node_port
    );
}

/// One selectable network, as printed by `network show`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSummary {
    pub name: String,
    pub selected: bool,
    /// `None` unless the network is in both override tables.
    pub address_prefix: Option<String>,
    /// Port a switch would use, before retained settings and overrides.
    pub full_node_port: Option<u16>,
    /// Whether settings are retained from a previous switch away.
    pub retained: bool,
}

/// Summarize every network named in `doc`'s override tables.
pub fn summarize(
    doc: &ConfigDocument,
    layout: &SwitchLayout,
    domain: &str,
) -> Result<Vec<NetworkSummary>> {
    let selected = doc.selected_network()?;

    doc.network_names()
        .into_iter()
        .map(|name| -> Result<NetworkSummary> {
            let profile = doc.network_profile(&name)?;
            let full_node_port = profile.as_ref().map(|profile| {
                NetworkDefaults::fallback(&name, domain)
                    .with_profile(&profile.config)
                    .full_node_port
            });
            Ok(NetworkSummary {
                selected: name == selected,
                address_prefix: profile.map(|profile| profile.config.address_prefix),
                full_node_port,
                retained: layout.settings_file(&name).is_file(),
                name,
            })
        })
        .collect()
}

fn show(args: ShowArgs) -> Result<()> {
    let (config, root) = load(&args.common)?;
    let doc = load_document(&root)?;
    let layout = SwitchLayout::new(root);

    println!("Selected network: {}", doc.selected_network()?);
    for network in summarize(&doc, &layout, &config.domain)? {
        let marker = if network.selected { '*' } else { ' ' };
        match (network.address_prefix, network.full_node_port) {
            (Some(prefix), Some(port)) => println!(
                "{marker} {:<16} prefix={prefix:<6} port={port:<6} retained={}",
                network.name, network.retained
            ),
            _ => println!(
                "{marker} {:<16} incomplete (missing from an override table)",
                network.name
            ),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CONFIG: &str = r#"
selected_network: mainnet
network_overrides:
  constants:
    mainnet: {}
    testnet11: {}
    orphan: {}
  config:
    mainnet:
      address_prefix: xch
    testnet11:
      address_prefix: txch
      default_full_node_port: 58445
"#;

    #[test]
    fn summarize_networks() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SwitchLayout::new(NodeRoot::new(dir.path()));
        fs::create_dir_all(layout.archive_dir("testnet11")).unwrap();
        fs::write(layout.settings_file("testnet11"), "{}").unwrap();
        let doc = ConfigDocument::parse("config.yaml", CONFIG).unwrap();

        let summary = summarize(&doc, &layout, "chia.net").unwrap();

        assert_eq!(
            summary,
            vec![
                NetworkSummary {
                    name: "mainnet".into(),
                    selected: true,
                    address_prefix: Some("xch".into()),
                    full_node_port: Some(8444),
                    retained: false,
                },
                NetworkSummary {
                    name: "orphan".into(),
                    selected: false,
                    address_prefix: None,
                    full_node_port: None,
                    retained: false,
                },
                NetworkSummary {
                    name: "testnet11".into(),
                    selected: false,
                    address_prefix: Some("txch".into()),
                    full_node_port: Some(58445),
                    retained: true,
                },
            ]
        );
    }
}
