//! Message-seeder integration tests. Need a reachable broker; run with
//! `cargo test -- --ignored`.

#[path = "utils.rs"]
mod utils;

use std::time::{Duration, Instant};

use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::Message;

use kafka_testing::{client_config, nb_safe_seed, with_seeded_topic, with_seeded_topic_keyed};

const CONSUME_DEADLINE: Duration = Duration::from_secs(60);

fn count_messages(topic: &str, expected: usize) -> anyhow::Result<usize> {
    let mut config = client_config();
    config
        .set("group.id", format!("{}_reader", topic))
        .set("auto.offset.reset", "earliest")
        .set("enable.auto.commit", "false");
    let consumer: BaseConsumer = config.create()?;
    consumer.subscribe(&[topic])?;

    let start = Instant::now();
    let mut received = 0;
    while received < expected && start.elapsed() < CONSUME_DEADLINE {
        if let Some(message) = consumer.poll(Duration::from_secs(1)) {
            message?;
            received += 1;
        }
    }
    Ok(received)
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn seeded_topic_holds_the_full_batch() {
    utils::init_test_logger();
    let config = client_config();
    let msgs: Vec<Vec<u8>> = (0..100)
        .map(|i| format!("message {}", i).into_bytes())
        .collect();

    let seed = nb_safe_seed("seeding_test");
    with_seeded_topic(&msgs, &config, seed(0), |topic| {
        let expected = msgs.len();
        async move {
            let received =
                tokio::task::spawn_blocking(move || count_messages(&topic, expected)).await??;
            assert_eq!(received, expected, "dropped messages");
            Ok(())
        }
    })
    .await
    .expect("seeding failed");
}

fn collect_keys(topic: &str, expected: usize) -> anyhow::Result<Vec<String>> {
    let mut config = client_config();
    config
        .set("group.id", format!("{}_key_reader", topic))
        .set("auto.offset.reset", "earliest")
        .set("enable.auto.commit", "false");
    let consumer: BaseConsumer = config.create()?;
    consumer.subscribe(&[topic])?;

    let start = Instant::now();
    let mut keys = Vec::new();
    while keys.len() < expected && start.elapsed() < CONSUME_DEADLINE {
        if let Some(message) = consumer.poll(Duration::from_secs(1)) {
            let message = message?;
            let key = message.key().unwrap_or_default();
            keys.push(String::from_utf8_lossy(key).into_owned());
        }
    }
    Ok(keys)
}

fn assert_key_cycle(keys: &[String], fanout: usize, per_key: usize) {
    for k in 0..fanout {
        let key = k.to_string();
        assert_eq!(
            keys.iter().filter(|have| **have == key).count(),
            per_key,
            "wrong count for key {}",
            key
        );
    }
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn keys_cycle_through_the_fanout() {
    utils::init_test_logger();
    let config = client_config();
    let msgs: Vec<Vec<u8>> = (0..34).map(|i: u32| i.to_be_bytes().to_vec()).collect();

    let seed = nb_safe_seed("seeding_test");
    with_seeded_topic(&msgs, &config, seed(1), |topic| {
        let expected = msgs.len();
        async move {
            let keys =
                tokio::task::spawn_blocking(move || collect_keys(&topic, expected)).await??;
            assert_eq!(keys.len(), expected);
            // 34 messages over the default fan-out of 17: "0".."16" twice each.
            assert_key_cycle(&keys, 17, 2);
            Ok(())
        }
    })
    .await
    .expect("seeding failed");
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn custom_fanout_changes_the_key_cycle() {
    utils::init_test_logger();
    let config = client_config();
    let msgs: Vec<Vec<u8>> = (0..10).map(|i: u32| i.to_be_bytes().to_vec()).collect();

    let seed = nb_safe_seed("seeding_test");
    with_seeded_topic_keyed(&msgs, &config, seed(2), 5, |topic| {
        let expected = msgs.len();
        async move {
            let keys =
                tokio::task::spawn_blocking(move || collect_keys(&topic, expected)).await??;
            assert_eq!(keys.len(), expected);
            // 10 messages over a fan-out of 5: "0".."4" twice each.
            assert_key_cycle(&keys, 5, 2);
            Ok(())
        }
    })
    .await
    .expect("seeding failed");
}
