use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use tracing::*;
use tracing_actix_web::TracingLogger;

use crate::{shutdown::Shutdown, stats::snapshot::SnapshotReader};

use super::pages;

/// Register all API routes on a `ServiceConfig`.
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats", web::get().to(pages::stats));
}

// Start REST API server with the desired address, serving until the shutdown fires
#[instrument(level = "debug", skip(snapshot, shutdown))]
pub async fn run(
    server_address: &str,
    snapshot: SnapshotReader,
    shutdown: Shutdown,
) -> Result<()> {
    let snapshot = web::Data::new(snapshot);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(snapshot.clone())
            .configure(configure_api_routes)
    })
    // Shutdown is driven by our own coordinator
    .disable_signals()
    .bind(server_address)
    .with_context(|| format!("Failed binding REST API server to {server_address:?}"))?
    .run();

    info!("Server running at {server_address}");

    let handle = server.handle();
    let stop = tokio::spawn(async move {
        shutdown.cancelled().await;
        debug!("Stopping REST API server");
        handle.stop(true).await;
    });

    let result = server.await.context("REST API server failed");
    stop.abort();

    result
}
