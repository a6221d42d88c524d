//! Concurrent in-memory trace aggregation.
//!
//! The store maps trace identifiers to their frame sequences for the
//! process lifetime. Memory-only and append-only: entries accumulate until
//! the process exits, and no frame is ever dropped or deduplicated. The map
//! is sharded by identifier hash, so appends to unrelated traces do not
//! contend; within one identifier the shard lock serializes writers, and a
//! reader never observes a partially appended trace.

use dashmap::DashMap;

use crate::domain::{Frame, Trace};
use crate::error::Result;

pub mod stats;

pub use stats::StatsReporter;

/// Process-wide aggregation of trace frames, keyed by trace identifier.
///
/// Safe for any number of concurrent readers and writers. The store
/// exclusively owns all trace state; callers only ever receive snapshots.
pub struct TraceStore {
    traces: DashMap<String, Trace>,
}

impl TraceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            traces: DashMap::new(),
        }
    }

    /// Snapshot of the frames stored for `id`, in arrival order.
    ///
    /// Unknown identifiers return an empty sequence; a trace may
    /// legitimately have no frames observed yet, so this is not an error.
    /// Appends after the call are not reflected in the returned snapshot.
    pub fn get_trace(&self, id: &str) -> Trace {
        self.traces
            .get(id)
            .map(|trace| trace.clone())
            .unwrap_or_default()
    }

    /// Append `frame` to its trace, creating the trace if absent.
    ///
    /// Infallible today; the `Result` return leaves room for future
    /// failure modes such as size limits.
    pub fn store_trace_frame(&self, frame: Frame) -> Result<()> {
        self.traces
            .entry(frame.trace_id.clone())
            .or_default()
            .push(frame);
        Ok(())
    }

    /// Number of distinct traces currently held.
    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    /// Total frames held across all traces.
    pub fn frame_count(&self) -> usize {
        self.traces.iter().map(|entry| entry.value().len()).sum()
    }
}

impl Default for TraceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TraceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceStore")
            .field("trace_count", &self.trace_count())
            .finish()
    }
}
