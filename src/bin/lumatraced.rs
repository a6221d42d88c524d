//! LumaTrace collector daemon.
//!
//! Wires the ingestion core together: store, stats reporter, and broker
//! publisher. The wire listener that decodes incoming frames and feeds the
//! store is hosted by the surrounding service.

use std::sync::Arc;

use lumatrace::{Config, Publisher, StatsReporter, TraceStore};
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };

    let store = Arc::new(TraceStore::new());
    let publisher = Publisher::connect(&config.transport)?;
    tracing::info!(
        topic = publisher.topic(),
        endpoints = publisher.endpoint_count(),
        "publisher ready"
    );

    let shutdown = CancellationToken::new();
    let stats = StatsReporter::spawn(
        Arc::clone(&store),
        config.stats.interval(),
        shutdown.clone(),
    );

    signal::ctrl_c().await?;
    tracing::info!(traces = store.trace_count(), "shutting down");
    shutdown.cancel();
    stats.await?;

    Ok(())
}
