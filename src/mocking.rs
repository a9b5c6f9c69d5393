//! Producer mocking for tests that must not touch a broker.
//!
//! Code under test publishes through the [`MessageSink`] trait instead of a
//! concrete producer. In production the sink is a real
//! [`FutureProducer`]; in unit tests it is a [`MockProducer`], which
//! completes every send immediately and records the arguments for
//! assertions.

use std::future::Future;
use std::sync::Mutex;

use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;

/// A destination for published messages.
pub trait MessageSink {
    /// Publishes one message and resolves once it is acknowledged.
    fn send_bytes(
        &self,
        topic: &str,
        payload: &[u8],
        key: &[u8],
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl MessageSink for FutureProducer {
    async fn send_bytes(&self, topic: &str, payload: &[u8], key: &[u8]) -> anyhow::Result<()> {
        self.send(
            FutureRecord::to(topic).payload(payload).key(key),
            Timeout::Never,
        )
        .await
        .map(|_| ())
        .map_err(|(err, _msg)| anyhow::Error::new(err).context("message delivery failed"))
    }
}

/// One recorded call to [`MockProducer::send_bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub key: Vec<u8>,
}

/// A [`MessageSink`] that performs no I/O.
///
/// Sends complete immediately and are appended to an internal log, which
/// tests inspect through [`sent`](MockProducer::sent) and
/// [`send_count`](MockProducer::send_count).
#[derive(Debug, Default)]
pub struct MockProducer {
    sent: Mutex<Vec<SentMessage>>,
}

impl MockProducer {
    pub fn new() -> MockProducer {
        MockProducer::default()
    }

    /// Number of sends recorded so far.
    pub fn send_count(&self) -> usize {
        self.log().len()
    }

    /// Snapshot of every recorded send, in call order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.log().clone()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<SentMessage>> {
        // The log holds no invariant worth abandoning on a poisoned lock.
        self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MessageSink for MockProducer {
    async fn send_bytes(&self, topic: &str, payload: &[u8], key: &[u8]) -> anyhow::Result<()> {
        self.log().push(SentMessage {
            topic: topic.to_owned(),
            payload: payload.to_owned(),
            key: key.to_owned(),
        });
        Ok(())
    }
}
