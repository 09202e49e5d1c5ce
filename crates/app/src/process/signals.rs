use std::io;
use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long in-flight requests get after SIGTERM.
const REQUEST_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Watch for SIGINT, SIGTERM or a send on `shutdown_tx` itself, then
///  broadcast shutdown to every receiver of the channel.
pub(crate) fn listen(shutdown_tx: watch::Sender<()>) -> io::Result<JoinHandle<()>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut requested = shutdown_tx.subscribe();

    Ok(tokio::spawn(async move {
        let reason = tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => {
                tracing::info!(grace = ?REQUEST_GRACE_PERIOD, "SIGTERM received, draining");
                tokio::time::sleep(REQUEST_GRACE_PERIOD).await;
                "SIGTERM"
            }
            _ = requested.changed() => "requested",
        };
        tracing::info!(reason, "shutting down");
        let _ = shutdown_tx.send(());
    }))
}
