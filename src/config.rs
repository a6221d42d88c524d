//! Configuration for the ingestion core.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TraceError};

/// Top-level configuration, JSON loadable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transport: TransportConfig,
    pub stats: StatsConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| TraceError::Config(e.to_string()))
    }
}

/// Broker publishing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Destination topic for all published batches.
    pub topic: String,
    /// Broker node TCP addresses. Fixed for the process lifetime; each
    /// address gets one producer in the failover rotation.
    pub endpoints: Vec<String>,
    /// Per-attempt connect deadline, milliseconds.
    pub connect_timeout_ms: u64,
    /// Per-attempt publish/acknowledgment deadline, milliseconds.
    pub io_timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            topic: "traces".to_string(),
            endpoints: vec!["127.0.0.1:4150".to_string()],
            connect_timeout_ms: 2_000,
            io_timeout_ms: 5_000,
        }
    }
}

impl TransportConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

/// Store statistics reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Interval between trace-count reports, milliseconds.
    pub interval_ms: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { interval_ms: 5_000 }
    }
}

impl StatsConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
