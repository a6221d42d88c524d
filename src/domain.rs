//! Core domain types: frames and traces.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// One recorded event belonging to a trace.
///
/// Carries the trace identifier that groups frames into one logical request
/// plus an opaque payload owned by the instrumentation layer. Immutable
/// once created.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Identifier shared by all frames of one logical request.
    pub trace_id: String,
    /// Opaque frame body; the core never inspects it.
    pub payload: Bytes,
    /// When this process accepted the frame. Informational only; ordering
    /// within a trace is arrival order, not timestamp order.
    pub received_at: DateTime<Utc>,
}

impl Frame {
    /// Create a frame stamped with the current time.
    pub fn new(trace_id: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            trace_id: trace_id.into(),
            payload: payload.into(),
            received_at: Utc::now(),
        }
    }
}

/// All frames sharing one trace identifier, in the order this process
/// accepted them. Append-only; never deduplicated or truncated.
pub type Trace = Vec<Frame>;
