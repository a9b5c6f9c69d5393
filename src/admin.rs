//! Topic provisioning against a live broker.
//!
//! Everything here talks to the cluster through an rdkafka [`AdminClient`]
//! and blocks, bounded by [`DEFAULT_WAIT`], until the broker's metadata
//! reflects the requested change.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{bail, Context as _};
use log::{debug, info};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::ClientConfig;

use crate::util::{wait_until, DEFAULT_WAIT};

/// Timeout for a single metadata request, not for the surrounding wait loop.
const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates an admin client for the given configuration.
pub fn create_admin(
    config: &ClientConfig,
) -> anyhow::Result<AdminClient<DefaultClientContext>> {
    config.create().context("error creating admin client")
}

/// Returns the names of all topics the broker currently lists.
pub fn list_topic_names(
    admin: &AdminClient<DefaultClientContext>,
) -> anyhow::Result<HashSet<String>> {
    let metadata = admin
        .inner()
        .fetch_metadata(None, METADATA_TIMEOUT)
        .context("error fetching cluster metadata")?;
    Ok(metadata
        .topics()
        .iter()
        .map(|topic| topic.name().to_owned())
        .collect())
}

/// Returns whether the broker currently lists a topic with the given name.
pub fn topic_exists(
    admin: &AdminClient<DefaultClientContext>,
    name: &str,
) -> anyhow::Result<bool> {
    Ok(list_topic_names(admin)?.contains(name))
}

/// Layout of topics created by [`create_missing_topics`].
///
/// An unset replication factor defaults to the number of live brokers; an
/// unset partition count defaults to the replication factor. `config` holds
/// additional broker-side topic parameters such as `retention.ms`.
#[derive(Debug, Clone, Default)]
pub struct TopicSpec {
    pub num_partitions: Option<i32>,
    pub replication_factor: Option<i32>,
    pub config: Vec<(String, String)>,
}

/// Creates every topic in `topic_names` that the broker does not already
/// list, then waits until the broker lists all of them.
pub async fn create_missing_topics(
    admin: &AdminClient<DefaultClientContext>,
    topic_names: &[&str],
    spec: &TopicSpec,
) -> anyhow::Result<()> {
    let metadata = admin
        .inner()
        .fetch_metadata(None, METADATA_TIMEOUT)
        .context("error fetching cluster metadata")?;
    let replication_factor = match spec.replication_factor {
        Some(n) => n,
        None => metadata.brokers().len() as i32,
    };
    let num_partitions = spec.num_partitions.unwrap_or(replication_factor);
    let existing: HashSet<&str> = metadata.topics().iter().map(|t| t.name()).collect();
    debug!(
        "create_missing_topics({:?}): existing={:?}, num_partitions={}, replication_factor={}",
        topic_names, existing, num_partitions, replication_factor
    );

    let missing: Vec<&str> = topic_names
        .iter()
        .copied()
        .filter(|name| !existing.contains(name))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    info!("create_missing_topics({:?}): creating {:?}", topic_names, missing);

    let new_topics: Vec<NewTopic<'_>> = missing
        .iter()
        .map(|&name| {
            let mut topic =
                NewTopic::new(name, num_partitions, TopicReplication::Fixed(replication_factor));
            for (key, value) in &spec.config {
                topic = topic.set(key, value);
            }
            topic
        })
        .collect();
    let results = admin
        .create_topics(new_topics.iter(), &AdminOptions::new())
        .await
        .context("error creating topics")?;
    for result in results {
        match result {
            Ok(_) => {}
            // Lost the race with another creator; the wait below still holds.
            Err((_, RDKafkaErrorCode::TopicAlreadyExists)) => {}
            Err((topic, code)) => bail!("failed to create topic {}: {}", topic, code),
        }
    }

    wait_until("created topics to appear in metadata", DEFAULT_WAIT, || {
        let listed = list_topic_names(admin)?;
        Ok(topic_names.iter().all(|name| listed.contains(*name)))
    })
    .await
}

/// Deletes a topic and waits until the broker no longer lists it. Deleting a
/// topic the broker does not know about is not an error.
pub async fn delete_topic(
    admin: &AdminClient<DefaultClientContext>,
    name: &str,
) -> anyhow::Result<()> {
    let results = admin
        .delete_topics(&[name], &AdminOptions::new())
        .await
        .context("error deleting topic")?;
    for result in results {
        match result {
            Ok(_) => {}
            Err((_, RDKafkaErrorCode::UnknownTopicOrPartition)) => {}
            Err((topic, code)) => bail!("failed to delete topic {}: {}", topic, code),
        }
    }

    wait_until("deleted topic to disappear from metadata", DEFAULT_WAIT, || {
        Ok(!topic_exists(admin, name)?)
    })
    .await
}
