//! Fan-out publishing with round-robin failover.

use bytes::Bytes;
use rand::Rng;

use super::producer::{Producer, TcpProducer};
use crate::config::TransportConfig;
use crate::error::{Result, TraceError};

/// One slot in the endpoint rotation.
///
/// An address whose producer could not be constructed stays in the rotation
/// as `Unavailable` so the slot layout matches the configured address list;
/// failover skips it, counting it as an immediately failed attempt, and
/// never touches a half-built client.
pub enum Endpoint<P> {
    /// Producer constructed successfully.
    Healthy(P),
    /// Producer construction failed for this address.
    Unavailable { addr: String },
}

/// Publishes opaque byte batches to exactly one reachable broker endpoint.
///
/// Each call picks a uniformly random starting slot and rotates through the
/// endpoint set, at most one attempt per endpoint, returning on the first
/// acknowledgment. Calls share no cursor, so any number may run
/// concurrently; the endpoint set itself is read-only after construction.
pub struct Publisher<P = TcpProducer> {
    topic: String,
    endpoints: Vec<Endpoint<P>>,
}

impl Publisher<TcpProducer> {
    /// Build a publisher with one TCP producer per configured address.
    ///
    /// A single bad address does not fail construction: it is logged and
    /// kept in the rotation as unavailable. Construction only fails when
    /// the endpoint list is empty, since such a publisher could never
    /// deliver anything.
    pub fn connect(config: &TransportConfig) -> Result<Self> {
        let mut endpoints = Vec::with_capacity(config.endpoints.len());
        for addr in &config.endpoints {
            match TcpProducer::new(addr.clone(), config.connect_timeout(), config.io_timeout()) {
                Ok(producer) => endpoints.push(Endpoint::Healthy(producer)),
                Err(e) => {
                    tracing::warn!(addr = %addr, error = %e, "failed to create broker producer");
                    endpoints.push(Endpoint::Unavailable { addr: addr.clone() });
                }
            }
        }
        Self::with_endpoints(config.topic.clone(), endpoints)
    }
}

impl<P: Producer> Publisher<P> {
    /// Build a publisher over an explicit endpoint set.
    pub fn with_endpoints(topic: impl Into<String>, endpoints: Vec<Endpoint<P>>) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(TraceError::Config(
                "at least one broker endpoint is required".to_string(),
            ));
        }
        Ok(Self {
            topic: topic.into(),
            endpoints,
        })
    }

    /// Destination topic for every published batch.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Number of slots in the rotation, unavailable ones included.
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Deliver `bodies` to one reachable endpoint.
    ///
    /// Starts at a random slot so repeated calls spread first-attempt load
    /// across the cluster instead of herding onto slot 0. Returns
    /// [`TraceError::PublishFailure`] only after every endpoint has been
    /// tried once and failed.
    pub async fn multi_publish(&self, bodies: &[Bytes]) -> Result<()> {
        let start = rand::thread_rng().gen_range(0..self.endpoints.len());
        self.multi_publish_from(start, bodies).await
    }

    /// Deliver `bodies` starting the rotation at `start`.
    ///
    /// Exactly the failover loop of [`multi_publish`](Self::multi_publish)
    /// with the starting slot pinned; attempts wrap past the end of the
    /// list and no endpoint is attempted twice in one call.
    pub async fn multi_publish_from(&self, start: usize, bodies: &[Bytes]) -> Result<()> {
        let slots = self.endpoints.len();
        let mut index = start % slots;

        for _ in 0..slots {
            match &self.endpoints[index] {
                Endpoint::Healthy(producer) => {
                    match producer.publish(&self.topic, bodies).await {
                        Ok(()) => return Ok(()),
                        Err(e) => {
                            tracing::warn!(
                                addr = producer.address(),
                                error = %e,
                                "publish attempt failed, rotating to next endpoint"
                            );
                        }
                    }
                }
                Endpoint::Unavailable { addr } => {
                    tracing::debug!(addr = %addr, "skipping endpoint without a producer");
                }
            }

            index += 1;
            if index >= slots {
                index = 0;
            }
        }

        Err(TraceError::PublishFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockProducer {
        id: usize,
        healthy: bool,
        attempts: Arc<AtomicUsize>,
        order: Arc<Mutex<Vec<usize>>>,
    }

    #[async_trait]
    impl Producer for MockProducer {
        async fn publish(&self, _topic: &str, _bodies: &[Bytes]) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            self.order.lock().push(self.id);
            if self.healthy {
                Ok(())
            } else {
                Err(TraceError::Broker("connection refused".to_string()))
            }
        }

        fn address(&self) -> &str {
            "mock"
        }
    }

    #[allow(clippy::type_complexity)]
    fn mock_publisher(
        health: &[bool],
    ) -> (Publisher<MockProducer>, Arc<AtomicUsize>, Arc<Mutex<Vec<usize>>>) {
        let attempts = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(Mutex::new(Vec::new()));
        let endpoints = health
            .iter()
            .enumerate()
            .map(|(id, &healthy)| {
                Endpoint::Healthy(MockProducer {
                    id,
                    healthy,
                    attempts: Arc::clone(&attempts),
                    order: Arc::clone(&order),
                })
            })
            .collect();
        let publisher = Publisher::with_endpoints("traces", endpoints).unwrap();
        (publisher, attempts, order)
    }

    fn bodies() -> Vec<Bytes> {
        vec![Bytes::from_static(b"payload")]
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let (publisher, attempts, _) = mock_publisher(&[true, true, true]);
        publisher.multi_publish(&bodies()).await.unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failover_tries_endpoints_in_rotation() {
        let (publisher, attempts, order) = mock_publisher(&[false, false, true]);
        publisher.multi_publish_from(0, &bodies()).await.unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_wraparound_from_last_slot() {
        let (publisher, _, order) = mock_publisher(&[true, false, false]);
        publisher.multi_publish_from(2, &bodies()).await.unwrap();
        assert_eq!(*order.lock(), vec![2, 0]);
    }

    #[tokio::test]
    async fn test_total_failure_attempts_each_endpoint_once() {
        let (publisher, attempts, order) = mock_publisher(&[false, false, false, false]);
        let result = publisher.multi_publish_from(1, &bodies()).await;
        assert!(matches!(result, Err(TraceError::PublishFailure)));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);

        let order = order.lock();
        assert_eq!(*order, vec![1, 2, 3, 0]);
        let mut deduped = order.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), 4, "an endpoint was attempted twice");
    }

    #[tokio::test]
    async fn test_unavailable_endpoint_counts_as_failed_attempt() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(Mutex::new(Vec::new()));
        let endpoints = vec![
            Endpoint::Unavailable {
                addr: "bad:4150".to_string(),
            },
            Endpoint::Healthy(MockProducer {
                id: 1,
                healthy: true,
                attempts: Arc::clone(&attempts),
                order: Arc::clone(&order),
            }),
        ];
        let publisher = Publisher::with_endpoints("traces", endpoints).unwrap();

        publisher.multi_publish_from(0, &bodies()).await.unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(*order.lock(), vec![1]);
    }

    #[tokio::test]
    async fn test_all_unavailable_is_publish_failure() {
        let endpoints: Vec<Endpoint<MockProducer>> = vec![
            Endpoint::Unavailable {
                addr: "a:1".to_string(),
            },
            Endpoint::Unavailable {
                addr: "b:2".to_string(),
            },
        ];
        let publisher = Publisher::with_endpoints("traces", endpoints).unwrap();
        let result = publisher.multi_publish(&bodies()).await;
        assert!(matches!(result, Err(TraceError::PublishFailure)));
    }

    #[test]
    fn test_empty_endpoint_list_rejected() {
        let endpoints: Vec<Endpoint<MockProducer>> = Vec::new();
        assert!(matches!(
            Publisher::with_endpoints("traces", endpoints),
            Err(TraceError::Config(_))
        ));
    }
}
