//! Test-support utilities for services built on Kafka.
//!
//! This crate is a test harness, not a client: the broker work is done by
//! [rdkafka], and everything here sequences admin and producer calls into the
//! scaffolding that integration tests actually need.
//!
//! The main entry points:
//!
//! - [`config::client_config`] builds a [`ClientConfig`](rdkafka::ClientConfig)
//!   from the `KAFKA_HOSTNAME` and `KAFKA_PORT` environment variables.
//! - [`admin::create_missing_topics`] provisions any absent topics and waits
//!   for them to appear in the broker's metadata.
//! - [`topic::with_ephemeral_topic`] runs a test body against a uniquely named
//!   topic that is created on entry and deleted on every exit path.
//! - [`producer::with_seeded_topic`] does the same but first publishes a batch
//!   of messages and waits for every delivery report, so the body can assume a
//!   fully populated topic.
//! - [`seed::nb_safe_seed`] derives reproducible seeds from a test's name, so
//!   repeated runs reuse topic names instead of leaking new ones.
//! - [`mocking::MockProducer`] stands in for a real producer behind the
//!   [`mocking::MessageSink`] trait, recording sends instead of performing them.
//! - [`fs::DirGuard`] scopes a working-directory change.
//! - [`process::run_script_and_cancel`] runs a script for a fixed duration,
//!   terminates it, and returns the captured output.
//!
//! Topic names derived from the same seed collide across runs by design, which
//! keeps a shared broker from accumulating topics but requires that tests
//! using one seed run serially.
//!
//! [rdkafka]: https://docs.rs/rdkafka

pub mod admin;
pub mod config;
pub mod fs;
pub mod mocking;
pub mod process;
pub mod producer;
pub mod seed;
pub mod topic;
pub mod util;

pub use crate::admin::{create_admin, create_missing_topics, TopicSpec};
pub use crate::config::{bootstrap_servers, client_config};
pub use crate::fs::{with_dir, DirGuard};
pub use crate::mocking::{MessageSink, MockProducer, SentMessage};
pub use crate::process::run_script_and_cancel;
pub use crate::producer::{with_seeded_topic, with_seeded_topic_keyed};
pub use crate::seed::nb_safe_seed;
pub use crate::topic::with_ephemeral_topic;
pub use crate::util::true_after;
