//! The node configuration document.
//!
//! [`ConfigDocument`] is an in-memory YAML tree mirroring `config/config.yaml`.
//! Fields are addressed with dotted [`ConfigPath`]s such as
//! `full_node.introducer_peer.host`; the document does not impose a schema
//! beyond the handful of typed accessors the switch orchestrator needs
//! (selected network, network override tables).

mod document;
mod error;
mod path;
mod types;

pub use document::{ConfigDocument, NETWORK_OVERRIDES_KEY, SELECTED_NETWORK_KEY};
pub use error::ConfigError;
pub use path::{ConfigPath, FieldUpdate};
pub use types::{NetworkConfig, NetworkConstants, NetworkProfile, OverrideTable, Peer};
