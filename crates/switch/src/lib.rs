//! Network profile switching.
//!
//! [`NetworkSwitcher`] swaps a node's selected network (for example
//! `mainnet` to `testnet11`):
//!
//! 1. validates the target against the config's network override tables
//! 2. snapshots the outgoing network's peer settings ([`RetainedSettings`])
//!    and loads any snapshot kept for the incoming network
//! 3. asks the running node to exit ([`ServiceGuard`])
//! 4. stages every network-specific field ([`NetworkDefaults`]) in memory
//! 5. swaps the network-scoped cache files ([`move_and_overwrite`])
//! 6. saves the config immediately, then removes stale peer caches
//!
//! A single invocation per node root is assumed; nothing here locks.

mod defaults;
mod error;
mod guard;
mod layout;
mod orchestrator;
mod relocate;
mod retention;

pub use defaults::{
    DEFAULT_DOMAIN, MAINNET, MAINNET_FULL_NODE_PORT, NetworkDefaults, SwitchOverrides,
    TESTNET_FULL_NODE_PORT,
};
pub use error::SwitchError;
pub use guard::{ServiceGuard, StopOutcome};
pub use layout::{CacheFile, SETTINGS_FILE_NAME, SwitchLayout};
pub use orchestrator::{NetworkSwitcher, SwitchOptions, SwitchReport};
pub use relocate::{MoveOutcome, Relocation, move_and_overwrite, remove_file_if_exists};
pub use retention::{RetainedSettings, RetentionError};
