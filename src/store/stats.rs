//! Periodic reporting of store statistics.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::store::TraceStore;

/// Background task that samples the store's trace count on a fixed
/// interval and emits it as an informational log line.
///
/// The count is read from the store first; formatting and logging happen
/// with no store guard held, so a slow logging sink never blocks writers.
/// The task runs until `shutdown` is cancelled, which lets tests and
/// graceful shutdown stop it deterministically.
pub struct StatsReporter;

impl StatsReporter {
    /// Spawn the reporter. The returned handle resolves once the task has
    /// observed cancellation and exited.
    pub fn spawn(
        store: Arc<TraceStore>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            // The first tick of a tokio interval fires immediately; consume
            // it so the first report lands one full interval after start.
            tick.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tick.tick() => {
                        let count = store.trace_count();
                        tracing::info!(traces = count, "traces stored");
                    }
                }
            }
        })
    }
}
