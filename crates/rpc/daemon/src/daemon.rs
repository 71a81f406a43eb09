//! Exit requests over the daemon's websocket endpoint.

use crate::{
    DaemonControl, DaemonError,
    message::{self, Answer},
    tls,
};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use netswitch_config::{ConfigDocument, ConfigError, ConfigPath};
use netswitch_node_core::dirs::NodeRoot;
use std::{io, path::PathBuf, sync::Arc, time::Duration};
use tokio::net::TcpStream;
use tokio_tungstenite::{Connector, connect_async_tls_with_config, tungstenite::Message};
use tracing::{debug, info, trace};

/// Host used when `self_hostname` is not configured.
const DEFAULT_HOSTNAME: &str = "localhost";

/// Daemon port used when `daemon_port` is not configured.
const DEFAULT_DAEMON_PORT: u16 = 55400;

/// Default client certificate, relative to the node root.
const DEFAULT_PRIVATE_CRT: &str = "config/ssl/daemon/private_daemon.crt";

/// Default client key, relative to the node root.
const DEFAULT_PRIVATE_KEY: &str = "config/ssl/daemon/private_daemon.key";

/// Connection settings for the daemon endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonRpcConfig {
    pub host: String,
    pub port: u16,
    /// Client certificate (PEM).
    pub cert: PathBuf,
    /// Client private key (PEM).
    pub key: PathBuf,
    /// Bound on connects and on the whole exit exchange.
    pub timeout: Duration,
}

impl DaemonRpcConfig {
    /// Read the endpoint and client identity from the node config.
    pub fn from_document(
        doc: &ConfigDocument,
        root: &NodeRoot,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let host: Option<String> = doc.get_as(&ConfigPath::parse("self_hostname")?)?;
        let port: Option<u16> = doc.get_as(&ConfigPath::parse("daemon_port")?)?;
        let cert: Option<String> = doc.get_as(&ConfigPath::parse("daemon_ssl.private_crt")?)?;
        let key: Option<String> = doc.get_as(&ConfigPath::parse("daemon_ssl.private_key")?)?;

        Ok(Self {
            host: host.unwrap_or_else(|| DEFAULT_HOSTNAME.to_string()),
            port: port.unwrap_or(DEFAULT_DAEMON_PORT),
            cert: root.resolve(cert.as_deref().unwrap_or(DEFAULT_PRIVATE_CRT)),
            key: root.resolve(key.as_deref().unwrap_or(DEFAULT_PRIVATE_KEY)),
            timeout,
        })
    }

    /// `host:port`
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `wss://host:port`
    pub fn url(&self) -> String {
        format!("wss://{}", self.endpoint())
    }
}

/// [`DaemonControl`] backed by the daemon's `exit` command.
///
/// The daemon owns every node service, so its exit stops them all.
#[derive(Debug, Clone)]
pub struct DaemonRpc {
    config: DaemonRpcConfig,
}

impl DaemonRpc {
    /// Create a client for the given endpoint.
    pub fn new(config: DaemonRpcConfig) -> Self {
        Self { config }
    }

    async fn exchange(&self, connector: Connector) -> Result<(), DaemonError> {
        let endpoint = self.endpoint();
        let ws_error = |source| DaemonError::WebSocket {
            endpoint: endpoint.clone(),
            source: Box::new(source),
        };

        let (mut socket, _) =
            connect_async_tls_with_config(self.config.url(), None, false, Some(connector))
                .await
                .map_err(ws_error)?;

        let request_id = message::request_id();
        socket
            .send(Message::text(message::exit_request(&request_id)))
            .await
            .map_err(ws_error)?;

        let outcome = loop {
            let frame = match socket.next().await {
                Some(frame) => frame.map_err(ws_error)?,
                None => {
                    break Err(DaemonError::Protocol {
                        endpoint: endpoint.clone(),
                        reason: "connection closed before a reply".into(),
                    });
                }
            };
            let text = match frame {
                Message::Text(text) => text,
                Message::Close(_) => {
                    break Err(DaemonError::Protocol {
                        endpoint: endpoint.clone(),
                        reason: "connection closed before a reply".into(),
                    });
                }
                other => {
                    trace!(%endpoint, ?other, "ignoring frame");
                    continue;
                }
            };
            let answer = message::answer(text.as_str(), &request_id).map_err(|err| {
                DaemonError::Protocol {
                    endpoint: endpoint.clone(),
                    reason: err.to_string(),
                }
            })?;
            match answer {
                Answer::Unrelated => continue,
                Answer::Accepted => break Ok(()),
                Answer::Refused(reason) => {
                    break Err(DaemonError::Rejected {
                        endpoint: endpoint.clone(),
                        reason,
                    });
                }
            }
        };

        // The daemon may already be gone; closing is best effort.
        let _ = socket.close(None).await;
        outcome
    }
}

#[async_trait]
impl DaemonControl for DaemonRpc {
    fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    async fn request_exit(&self) -> Result<(), DaemonError> {
        // Nothing listening: report the refusal before touching certificates.
        self.probe().await?;

        let endpoint = self.endpoint();
        let tls = tls::client_config(&self.config.cert, &self.config.key)?;
        info!(%endpoint, "requesting daemon exit");

        let exchange = self.exchange(Connector::Rustls(Arc::new(tls)));
        match tokio::time::timeout(self.config.timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(DaemonError::Timeout {
                    endpoint,
                    timeout: self.config.timeout,
                });
            }
        }

        debug!(%endpoint, "daemon acknowledged exit request");
        Ok(())
    }

    async fn probe(&self) -> Result<(), DaemonError> {
        let endpoint = self.endpoint();
        let connect = TcpStream::connect((self.config.host.as_str(), self.config.port));
        match tokio::time::timeout(self.config.timeout, connect).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(source)) => Err(DaemonError::Connect { endpoint, source }),
            Err(_) => Err(DaemonError::Connect {
                endpoint,
                source: io::Error::new(io::ErrorKind::TimedOut, "connect timed out"),
            }),
        }
    }
}
