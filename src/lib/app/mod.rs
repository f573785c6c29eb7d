use std::{
    fs::File,
    io::{Read, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use tracing::*;

use crate::{
    cli,
    metrics::MetricsSource,
    server,
    shutdown::{keypress, signal, Shutdown},
    stats::{sampler::Sampler, snapshot},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_file: PathBuf,
    pub interval: Duration,
    pub disk_path: PathBuf,
    /// `None` disables the REST API server.
    pub server_address: Option<String>,
}

impl Settings {
    pub fn from_command_line() -> Self {
        Self {
            log_file: cli::manager::log_file(),
            interval: cli::manager::log_interval(),
            disk_path: cli::manager::disk_path(),
            server_address: cli::manager::server_address(),
        }
    }
}

/// Create the metric log file, truncating any previous content.
pub fn create_log_file(settings: &Settings) -> Result<File> {
    File::create(&settings.log_file)
        .with_context(|| format!("Error creating log file {:?}", settings.log_file))
}

/// Run every component until the shutdown fires and they all stop.
///
/// The keypress watcher reading `input` is left detached, it can't be
/// interrupted while blocked on a read.
#[instrument(level = "debug", skip(source, log_sink, input))]
pub async fn run<S, W, R>(settings: Settings, source: S, log_sink: W, input: R) -> Result<()>
where
    S: MetricsSource + Send + 'static,
    W: Write + Send + 'static,
    R: Read + Send + 'static,
{
    let shutdown = Shutdown::new();

    // Started first, nothing else is running yet if the thread can't be spawned
    keypress::spawn(input, shutdown.clone())
        .context("Failed to spawn keypress watcher")?;

    let (snapshot_writer, snapshot_reader) = snapshot::channel();

    let sampler = Sampler::new(
        source,
        snapshot_writer,
        log_sink,
        settings.disk_path.clone(),
        settings.interval,
    );
    let sampler_handle = tokio::spawn(sampler.run(shutdown.clone()));

    let signal_handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(error) = signal::watch(shutdown).await {
                error!("Signal watcher failed: {error:#}");
            }
        }
    });

    let server_handle = settings.server_address.clone().map(|address| {
        let snapshot = snapshot_reader.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            // Other components keep going without the REST API
            if let Err(error) = server::manager::run(&address, snapshot, shutdown).await {
                error!("Error starting server: {error:#}");
            }
        })
    });

    if let Err(error) = sampler_handle.await {
        error!("Sampler task failed: {error}");
    }
    if let Err(error) = signal_handle.await {
        error!("Signal watcher task failed: {error}");
    }
    if let Some(server_handle) = server_handle {
        if let Err(error) = server_handle.await {
            error!("REST API server task failed: {error}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_failure_is_reported() {
        let settings = Settings {
            log_file: "/potato/does/not/exist/hardware_log.txt".into(),
            interval: Duration::from_secs(1),
            disk_path: "/".into(),
            server_address: None,
        };

        let error = create_log_file(&settings).unwrap_err();
        assert!(error.to_string().contains("Error creating log file"));
    }
}
