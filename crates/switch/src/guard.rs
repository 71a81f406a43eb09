//! Stops node services before their files are touched.

use netswitch_rpc::{DaemonControl, DaemonError, RetryPolicy};
use tracing::{debug, info};

/// What [`ServiceGuard::stop_if_running`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Nothing was listening.
    NotRunning,
    /// Services were running and have exited.
    Stopped,
}

/// Ensures node services are stopped.
#[derive(Debug)]
pub struct ServiceGuard<D> {
    daemon: D,
    wait: RetryPolicy,
}

impl<D: DaemonControl> ServiceGuard<D> {
    /// `wait` bounds how long to wait for services to exit after the request.
    pub fn new(daemon: D, wait: RetryPolicy) -> Self {
        Self { daemon, wait }
    }

    /// The controlled daemon.
    pub fn daemon(&self) -> &D {
        &self.daemon
    }

    /// Ask services to exit and wait until they stop accepting connections.
    ///
    /// A refused connection on the exit request means nothing is running.
    /// Any other failure is returned.
    pub async fn stop_if_running(&self) -> Result<StopOutcome, DaemonError> {
        let endpoint = self.daemon.endpoint();

        match self.daemon.request_exit().await {
            Ok(()) => {}
            Err(e) if e.is_connection_refused() => {
                debug!(%endpoint, "daemon not running");
                return Ok(StopOutcome::NotRunning);
            }
            Err(e) => return Err(e),
        }

        info!(%endpoint, "stopping all services");
        let attempts = self.wait.attempts();
        self.wait
            .run(|_| {
                let endpoint = endpoint.clone();
                async move {
                    match self.daemon.probe().await {
                        Ok(()) => Err(DaemonError::StillRunning { endpoint, attempts }),
                        Err(e) if e.is_connection_refused() => Ok(()),
                        Err(e) => Err(e),
                    }
                }
            })
            .await?;

        info!(%endpoint, "all services stopped");
        Ok(StopOutcome::Stopped)
    }
}
