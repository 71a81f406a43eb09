//! Node infrastructure shared by the netswitch commands.
//!
//! This crate provides the protocol-agnostic pieces every command needs:
//! - [`args`] - CLI argument structs for logging and the node root
//! - [`dirs`] - Node root directory resolution
//! - [`fs`] - Durable file writes
//! - [`logging`] - Logging initialization
//! - [`version`] - Version information
//!
//! The switch orchestrator itself lives in `netswitch-switch`.

pub mod args;
pub mod constants;
pub mod dirs;
pub mod fs;
pub mod logging;
pub mod version;
