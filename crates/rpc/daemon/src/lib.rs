//! Control of the locally running node.
//!
//! The switch orchestrator only needs one thing from the node: a best-effort
//! request to exit. This crate defines that boundary as the [`DaemonControl`]
//! trait, provides [`DaemonRpc`], which sends the daemon's `exit` command over
//! its mutual-TLS websocket, and classifies "nothing was listening" errors
//! with [`is_connection_refused`].

mod daemon;
mod error;
mod message;
mod refused;
mod retry;
mod tls;

pub use daemon::{DaemonRpc, DaemonRpcConfig};
pub use error::DaemonError;
pub use refused::is_connection_refused;
pub use retry::RetryPolicy;

use async_trait::async_trait;

/// Control over a locally running node service.
#[async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait DaemonControl: Send + Sync {
    /// Human readable endpoint, used in logs and errors.
    fn endpoint(&self) -> String;

    /// Ask the running service to exit.
    ///
    /// Returns an error for which [`is_connection_refused`] holds when
    /// nothing is listening.
    async fn request_exit(&self) -> Result<(), DaemonError>;

    /// Check whether the service still accepts connections.
    async fn probe(&self) -> Result<(), DaemonError>;
}
