use std::future::Future;
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancel `token` on the first SIGTERM or Ctrl+C
pub fn spawn_signal_listener(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = wait_for_signal() => match result {
                Ok(name) => tracing::info!("{} received, draining", name),
                Err(e) => {
                    tracing::error!("Failed to listen for shutdown signals: {}", e);
                    return;
                }
            },
            _ = token.cancelled() => return,
        }
        token.cancel();
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal as unix_signal};

    let mut terminate = unix_signal(SignalKind::terminate())?;
    tokio::select! {
        _ = terminate.recv() => Ok("SIGTERM"),
        result = signal::ctrl_c() => result.map(|_| "SIGINT"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    signal::ctrl_c().await.map(|_| "Ctrl+C")
}

/// Drive `server` to completion, giving it at most `grace` once `token` is cancelled.
///
/// `server` must stop accepting by itself when the token fires. Returns
/// `None` when the grace period ran out before in-flight work finished.
pub async fn drain<F>(server: F, token: CancellationToken, grace: Duration) -> Option<F::Output>
where
    F: Future,
{
    tokio::pin!(server);

    tokio::select! {
        output = &mut server => return Some(output),
        _ = token.cancelled() => {}
    }

    match tokio::time::timeout(grace, server).await {
        Ok(output) => {
            tracing::info!("Drained in-flight requests");
            Some(output)
        }
        Err(_) => {
            tracing::warn!("Grace period of {:?} elapsed with requests in flight", grace);
            None
        }
    }
}

/// How long the runtime waits for its threads once serving has stopped
pub const RUNTIME_EXIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Shut the runtime down without waiting on leftover blocking work.
///
/// Tokenization still running after `drain` gave up is abandoned here
/// instead of holding the process open until it finishes.
pub fn release_runtime(runtime: Runtime) {
    runtime.shutdown_timeout(RUNTIME_EXIT_TIMEOUT);
}
