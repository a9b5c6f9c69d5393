//! Broker configuration for tests.
//!
//! The broker address comes from `KAFKA_HOSTNAME` and `KAFKA_PORT`, falling
//! back to a local single-node setup when either is unset.

use std::env;

use rdkafka::ClientConfig;

/// Hostname used when `KAFKA_HOSTNAME` is unset.
pub const DEFAULT_HOSTNAME: &str = "localhost";

/// Port used when `KAFKA_PORT` is unset.
pub const DEFAULT_PORT: &str = "9092";

/// Returns the `host:port` address of the broker under test.
pub fn bootstrap_servers() -> String {
    let hostname = env::var("KAFKA_HOSTNAME").unwrap_or_else(|_| DEFAULT_HOSTNAME.to_owned());
    let port = env::var("KAFKA_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_owned());
    format!("{}:{}", hostname, port)
}

/// Returns a client configuration with `bootstrap.servers` pointing at the
/// broker under test. Callers may set further parameters before creating a
/// client from it.
pub fn client_config() -> ClientConfig {
    let mut config = ClientConfig::new();
    config.set("bootstrap.servers", bootstrap_servers());
    config
}
