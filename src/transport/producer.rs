//! Producers: per-node broker clients.

use std::time::Duration;

use async_trait::async_trait;
use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::wire;
use crate::error::{Result, TraceError};

/// Delivery to a single broker node.
///
/// One call is one attempt: the implementation must report success only
/// after the node acknowledged the whole batch, and must not retry
/// internally; retry across nodes belongs to the publisher.
#[async_trait]
pub trait Producer: Send + Sync {
    /// Deliver `bodies` under `topic` and wait for the acknowledgment.
    async fn publish(&self, topic: &str, bodies: &[Bytes]) -> Result<()>;

    /// Address of the node this producer targets, for logging.
    fn address(&self) -> &str;
}

/// Producer over a plain TCP connection to one broker node.
///
/// Connects per publish call; the broker protocol is a single
/// command/acknowledgment exchange, so holding idle connections buys
/// nothing the failover rotation does not already provide. Both the connect
/// and the command/ack exchange run under their own deadlines so a hung
/// node costs a bounded amount of time before failover moves on.
pub struct TcpProducer {
    addr: String,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl TcpProducer {
    /// Create a producer for `addr` (`host:port`).
    ///
    /// Fails fast on addresses that can never connect, so the publisher can
    /// mark the endpoint unavailable at construction instead of burning a
    /// timeout on every rotation.
    pub fn new(
        addr: impl Into<String>,
        connect_timeout: Duration,
        io_timeout: Duration,
    ) -> Result<Self> {
        let addr = addr.into();
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| TraceError::Config(format!("broker address missing port: {}", addr)))?;
        if host.is_empty() {
            return Err(TraceError::Config(format!(
                "broker address missing host: {}",
                addr
            )));
        }
        if port.parse::<u16>().is_err() {
            return Err(TraceError::Config(format!(
                "broker address has invalid port: {}",
                addr
            )));
        }
        Ok(Self {
            addr,
            connect_timeout,
            io_timeout,
        })
    }
}

#[async_trait]
impl Producer for TcpProducer {
    async fn publish(&self, topic: &str, bodies: &[Bytes]) -> Result<()> {
        let mut socket = timeout(self.connect_timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| TraceError::Timeout)??;

        let command = wire::encode_mpub(topic, bodies);
        let exchange = async {
            socket.write_all(wire::MAGIC).await?;
            socket.write_all(&command).await?;

            let mut size_buf = [0u8; 4];
            socket.read_exact(&mut size_buf).await?;
            let size = BigEndian::read_u32(&size_buf) as usize;
            if size > wire::MAX_RESPONSE_SIZE {
                return Err(TraceError::Protocol(format!(
                    "oversized response frame: {} bytes",
                    size
                )));
            }
            let mut payload = vec![0u8; size];
            socket.read_exact(&mut payload).await?;
            Ok(payload)
        };
        let payload = timeout(self.io_timeout, exchange)
            .await
            .map_err(|_| TraceError::Timeout)??;

        let response = wire::decode_response(&payload)?;
        if response.is_ok() {
            Ok(())
        } else {
            Err(TraceError::Broker(response.error_message()))
        }
    }

    fn address(&self) -> &str {
        &self.addr
    }
}
