//! Error types for daemon control.

use std::{io, path::PathBuf, time::Duration};

/// Error type for [`DaemonControl`](crate::DaemonControl) operations.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// TCP connection to the endpoint failed.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    /// The websocket handshake or exchange failed.
    #[error("websocket exchange with {endpoint} failed: {source}")]
    WebSocket {
        endpoint: String,
        #[source]
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },

    /// The daemon answered with something other than the expected reply.
    #[error("unexpected reply from {endpoint}: {reason}")]
    Protocol { endpoint: String, reason: String },

    /// No reply arrived in time.
    #[error("{endpoint} did not answer within {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },

    /// The daemon answered but refused to exit.
    #[error("{endpoint} rejected the exit request: {reason}")]
    Rejected { endpoint: String, reason: String },

    /// The client certificate or key could not be read.
    #[error("failed to read client certificate {}: {source}", .path.display())]
    Certificate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A PEM file held no certificate or key.
    #[error("no PEM {kind} found in {}", .path.display())]
    MissingPem { path: PathBuf, kind: &'static str },

    /// The client identity was not accepted by the TLS stack.
    #[error("invalid client identity: {0}")]
    Tls(#[from] rustls::Error),

    /// The service kept accepting connections after it was asked to exit.
    #[error("{endpoint} still accepting connections after {attempts} attempts")]
    StillRunning { endpoint: String, attempts: u32 },
}

impl DaemonError {
    /// Whether this error means nothing was listening on the endpoint.
    pub fn is_connection_refused(&self) -> bool {
        crate::is_connection_refused(self)
    }
}
