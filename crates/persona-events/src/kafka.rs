//! Kafka transport.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;

use crate::config::EventsConfig;
use crate::error::ConsumerError;
use crate::source::{RawRecord, RecordSource};

/// [`RecordSource`] over an rdkafka `StreamConsumer`.
pub struct KafkaRecordSource {
    consumer: StreamConsumer,
}

impl KafkaRecordSource {
    /// Create the consumer and subscribe to the configured topic.
    ///
    /// Offsets are committed automatically and a new group starts at the
    /// latest offset.
    pub fn new(config: &EventsConfig) -> Result<Self, ConsumerError> {
        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "latest");
        for (key, value) in &config.properties {
            client_config.set(key, value);
        }

        let consumer: StreamConsumer = client_config
            .create()
            .map_err(|e| ConsumerError::Setup(e.to_string()))?;
        consumer
            .subscribe(&[config.topic.as_str()])
            .map_err(|e| ConsumerError::Setup(e.to_string()))?;

        tracing::info!(topic = %config.topic, group_id = %config.group_id, "Subscribed to event stream");
        Ok(Self { consumer })
    }
}

#[async_trait]
impl RecordSource for KafkaRecordSource {
    async fn poll(&mut self, timeout: Duration) -> Result<Option<RawRecord>, ConsumerError> {
        match tokio::time::timeout(timeout, self.consumer.recv()).await {
            Err(_) => Ok(None),
            Ok(Ok(message)) => Ok(Some(RawRecord {
                topic: message.topic().to_string(),
                partition: message.partition(),
                offset: message.offset(),
                payload: message.payload().map(<[u8]>::to_vec),
            })),
            Ok(Err(e)) => Err(e.into()),
        }
    }
}
