use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use thiserror::Error;

/// Failure to decode a framed event payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is {len} bytes, shorter than the {prefix}-byte framing prefix")]
    TooShort { len: usize, prefix: usize },

    #[error("schema {version} could not be parsed: {source}")]
    InvalidSchema {
        version: String,
        #[source]
        source: apache_avro::Error,
    },

    #[error("payload does not match schema {version}: {source}")]
    Mismatch {
        version: String,
        #[source]
        source: apache_avro::Error,
    },

    #[error("payload has {trailing} trailing bytes under schema {version}")]
    TrailingBytes { version: String, trailing: usize },

    #[error("no schemas configured")]
    NoSchemas,
}

/// Failure that stops the invalidation consumer.
#[derive(Debug, Error)]
pub enum ConsumerError {
    #[error("failed to create Kafka consumer: {0}")]
    Setup(String),

    #[error("event stream transport failed: {0}")]
    Transport(String),

    /// Recoverable transport hiccup, such as a broker connection dropping.
    /// The consumer logs it and polls again.
    #[error("event stream temporarily unavailable: {0}")]
    Transient(String),

    #[error("consumer task failed: {0}")]
    Task(String),
}

impl ConsumerError {
    /// Whether the consumer can keep polling after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<KafkaError> for ConsumerError {
    fn from(e: KafkaError) -> Self {
        // librdkafka recovers from broker outages on its own; only a fatal
        // client error leaves the consumer unusable.
        let fatal = matches!(e, KafkaError::MessageConsumptionFatal(_))
            || e.rdkafka_error_code() == Some(RDKafkaErrorCode::Fatal);
        if fatal {
            Self::Transport(e.to_string())
        } else {
            Self::Transient(e.to_string())
        }
    }
}
