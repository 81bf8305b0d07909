use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Change-event consumer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Run the invalidation consumer alongside the API
    #[serde(default)]
    pub enabled: bool,

    /// Kafka bootstrap servers
    #[serde(default = "default_brokers")]
    pub brokers: String,

    #[serde(default = "default_topic")]
    pub topic: String,

    #[serde(default = "default_group_id")]
    pub group_id: String,

    /// Upper bound for one poll in milliseconds
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,

    /// Extra librdkafka properties (security.protocol, ssl.*, sasl.*)
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

fn default_brokers() -> String {
    "localhost:9092".to_string()
}

fn default_topic() -> String {
    "pdl.leesah-v1".to_string()
}

fn default_group_id() -> String {
    "persona-v1".to_string()
}

fn default_poll_timeout_ms() -> u64 {
    100
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            brokers: default_brokers(),
            topic: default_topic(),
            group_id: default_group_id(),
            poll_timeout_ms: default_poll_timeout_ms(),
            properties: HashMap::new(),
        }
    }
}

impl EventsConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}
