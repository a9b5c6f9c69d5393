//! Ephemeral test topics.

use std::future::Future;
use std::panic::{resume_unwind, AssertUnwindSafe};

use futures_util::FutureExt;
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rdkafka::ClientConfig;

use crate::admin::{create_admin, create_missing_topics, delete_topic, topic_exists, TopicSpec};

/// Upper bound (inclusive) of the random name suffix.
const SUFFIX_BOUND: u64 = 10_000_000_000;

/// Derives a topic name as `prefix` plus a random integer, zero-padded to at
/// least three digits.
///
/// With a seed the name is fully deterministic, so repeated runs of one test
/// reuse a single topic instead of leaving a new one behind each time. The
/// flip side is that two tests sharing a seed and a broker must not run
/// concurrently.
pub fn derive_topic_name(prefix: &str, seed: Option<u64>) -> String {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let suffix = rng.random_range(0..=SUFFIX_BOUND).to_string();
    format!("{}{:0>3}", prefix, suffix)
}

/// Runs `body` against a topic that exists only for the duration of the call.
///
/// A leftover topic of the same name from an earlier run is deleted first.
/// The topic is created (and confirmed present in the broker's metadata)
/// before `body` runs, and deleted again on every exit path: a successful
/// body, a failing one, or a panicking one (a failed `assert!` in the body
/// unwinds, and the panic resumes after cleanup). Deletion failures during
/// cleanup are logged, never surfaced.
pub async fn with_ephemeral_topic<T, F, Fut>(
    config: &ClientConfig,
    prefix: &str,
    seed: Option<u64>,
    body: F,
) -> anyhow::Result<T>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let admin = create_admin(config)?;
    let topic = derive_topic_name(prefix, seed);

    if topic_exists(&admin, &topic)? {
        warn!("topic {} exists, deleting it", topic);
        delete_topic(&admin, &topic).await?;
    }
    create_missing_topics(&admin, &[&topic], &TopicSpec::default()).await?;

    let result = AssertUnwindSafe(body(topic.clone())).catch_unwind().await;

    if let Err(err) = delete_topic(&admin, &topic).await {
        warn!("failed to clean up topic {}: {:#}", topic, err);
    }
    match result {
        Ok(result) => result,
        Err(panic) => resume_unwind(panic),
    }
}
