//! Error types for the trace ingestion core.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TraceError>;

/// All errors surfaced by the ingestion core.
///
/// Store operations never fail today; their `Result` return exists so that
/// future failure modes (size limits, quotas) do not change the interface.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Transport-level I/O failure against a single broker node.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Every configured broker endpoint refused the batch.
    ///
    /// Per-node causes are logged, not surfaced; callers only need to know
    /// the batch was not delivered anywhere.
    #[error("failed to publish to any broker endpoint")]
    PublishFailure,

    /// A broker node answered with an error frame.
    #[error("broker error: {0}")]
    Broker(String),

    /// Malformed data on the broker connection.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Invalid configuration (bad address, empty endpoint list, bad file).
    #[error("config error: {0}")]
    Config(String),

    /// Connect or acknowledgment deadline exceeded.
    #[error("operation timed out")]
    Timeout,
}
