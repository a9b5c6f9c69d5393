//! Seeding ephemeral topics with messages.

use std::future::Future;
use std::time::Duration;

use anyhow::Context as _;
use futures_util::future;
use log::info;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use rdkafka::ClientConfig;

use crate::topic::with_ephemeral_topic;

/// Number of distinct partition keys the seeder cycles through. Message `i`
/// is keyed with `i % KEY_FANOUT`, spreading the batch across partitions
/// deterministically.
pub const KEY_FANOUT: usize = 17;

/// Prefix of topics created by the seeder.
pub const SEEDED_TOPIC_PREFIX: &str = "my_topic_";

const FLUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs `body` against an ephemeral topic pre-populated with `msgs`.
///
/// Every message is published (key `i % KEY_FANOUT`) and its delivery report
/// awaited before `body` runs, so the body may assume the topic holds the
/// complete batch. Publish failures propagate; the topic is still cleaned up
/// and the producer dropped on every exit path. The seed is mandatory so that
/// reruns hit the same topic name.
pub async fn with_seeded_topic<T, F, Fut>(
    msgs: &[Vec<u8>],
    config: &ClientConfig,
    seed: u64,
    body: F,
) -> anyhow::Result<T>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    with_seeded_topic_keyed(msgs, config, seed, KEY_FANOUT, body).await
}

/// Like [`with_seeded_topic`], with a caller-chosen key fan-out.
pub async fn with_seeded_topic_keyed<T, F, Fut>(
    msgs: &[Vec<u8>],
    config: &ClientConfig,
    seed: u64,
    key_fanout: usize,
    body: F,
) -> anyhow::Result<T>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    anyhow::ensure!(key_fanout > 0, "key fan-out must be positive");
    with_ephemeral_topic(config, SEEDED_TOPIC_PREFIX, Some(seed), |topic| async move {
        let producer: FutureProducer = config.create().context("error creating producer")?;
        info!("producer created for topic {}", topic);

        {
            let producer = &producer;
            let topic = topic.as_str();
            let sends = msgs
                .iter()
                .enumerate()
                .map(|(i, payload)| {
                    let key = (i % key_fanout).to_string();
                    async move {
                        producer
                            .send(
                                FutureRecord::to(topic).payload(payload.as_slice()).key(&key),
                                Timeout::Never,
                            )
                            .await
                    }
                })
                .collect::<Vec<_>>();
            let deliveries = future::join_all(sends).await;
            producer
                .flush(FLUSH_TIMEOUT)
                .context("error flushing producer")?;
            for delivery in deliveries {
                delivery
                    .map_err(|(err, _msg)| err)
                    .context("message delivery failed")?;
            }
        }
        info!("seeded topic {} with {} messages", topic, msgs.len());

        body(topic).await
    })
    .await
}
