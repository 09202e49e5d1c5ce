//! Service lifecycle: logging setup, the API task, and shutdown.

mod logging;
mod signals;

use std::net::SocketAddr;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::http_server;
use crate::{ServiceConfig, ServiceState};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle on a running service.
pub struct ShutdownHandle {
    listener: JoinHandle<()>,
    tasks: Vec<JoinHandle<()>>,
    shutdown_tx: watch::Sender<()>,
}

impl ShutdownHandle {
    /// Wait for a signal or [`ShutdownHandle::shutdown`], then for every
    ///  task to wind down. Fails if they take longer than 30 seconds.
    pub async fn wait(self) -> anyhow::Result<()> {
        let _ = self.listener.await;

        if timeout(FINAL_SHUTDOWN_TIMEOUT, join_all(self.tasks))
            .await
            .is_err()
        {
            tracing::error!(
                timeout = ?FINAL_SHUTDOWN_TIMEOUT,
                "tasks still running at shutdown deadline"
            );
            anyhow::bail!(
                "service did not shut down within {} seconds",
                FINAL_SHUTDOWN_TIMEOUT.as_secs()
            );
        }
        tracing::info!("service stopped");
        Ok(())
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Open storage and spawn the API server.
///
/// Dropping the returned handle does not stop the service.
pub async fn start_service(
    service_config: &ServiceConfig,
) -> anyhow::Result<(ServiceState, ShutdownHandle)> {
    let state = ServiceState::from_config(service_config)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "could not set up service state"))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let listener = signals::listen(shutdown_tx.clone())?;

    let api_addr = SocketAddr::from(([0, 0, 0, 0], service_config.api_port));
    let api_config = http_server::Config::new(api_addr).with_log_level(service_config.log_level);
    let api_state = state.clone();
    let api = tokio::spawn(async move {
        if let Err(e) = http_server::run_api(api_config, api_state, shutdown_rx).await {
            tracing::error!(error = %e, "API server stopped with an error");
        }
    });

    Ok((
        state,
        ShutdownHandle {
            listener,
            tasks: vec![api],
            shutdown_tx,
        },
    ))
}

/// Run the service until a shutdown signal arrives.
pub async fn spawn_service(service_config: &ServiceConfig) -> anyhow::Result<()> {
    let _guards = logging::init(service_config)?;
    let (_, handle) = start_service(service_config).await?;
    handle.wait().await
}
