//! Delivery of serialized frame batches to the broker cluster.
//!
//! The publisher owns a fixed set of per-node producers and rotates across
//! them on failure; the wire module defines the publish/acknowledgment
//! protocol both sides speak.

pub mod producer;
pub mod publisher;
pub mod wire;

pub use producer::{Producer, TcpProducer};
pub use publisher::{Endpoint, Publisher};
