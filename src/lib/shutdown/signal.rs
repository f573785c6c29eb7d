use anyhow::Result;
use tracing::*;

use super::{Shutdown, Trigger};

/// Wait for SIGINT or SIGTERM and fire the shutdown.
///
/// Returns early when the shutdown is fired by another trigger.
#[instrument(level = "debug", skip_all)]
pub async fn watch(shutdown: Shutdown) -> Result<()> {
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => {
            debug!("Signal watcher stopped");
        }
        result = wait_for_signal() => {
            result?;
            shutdown.fire(Trigger::Signal);
        }
    }

    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Received SIGINT");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM");
        }
    }

    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("Received SIGINT");

    Ok(())
}
