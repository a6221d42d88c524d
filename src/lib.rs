//! LumaTrace ingestion core
//!
//! The in-process core of a distributed-trace collector:
//! - [`TraceStore`]: concurrent in-memory aggregation of trace frames,
//!   keyed by trace identifier
//! - [`StatsReporter`]: periodic background reporting of store size
//! - [`Publisher`]: fault-tolerant fan-out of serialized frame batches to a
//!   broker cluster, round-robin with failover across endpoints
//!
//! The wire listener that decodes incoming frames and the schema of a
//! frame's payload live in the surrounding service; this crate only accepts
//! [`Frame`] values and pushes opaque byte batches downstream.

pub mod config;
pub mod domain;
pub mod error;
pub mod store;
pub mod transport;

pub use config::{Config, StatsConfig, TransportConfig};
pub use domain::{Frame, Trace};
pub use error::{Result, TraceError};
pub use store::{StatsReporter, TraceStore};
pub use transport::{Endpoint, Producer, Publisher, TcpProducer};
