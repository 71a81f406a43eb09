//! Command implementations.

pub mod network;
