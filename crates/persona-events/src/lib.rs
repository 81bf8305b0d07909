//! Cache invalidation from the registry's change-event stream.
//!
//! Records arrive as framed Avro `Personhendelse` payloads. The
//! [`SchemaDecoder`] tries every known schema generation, newest first; the
//! [`InvalidationConsumer`] turns national-identifier changes into cache
//! purges.

pub mod config;
pub mod consumer;
pub mod decoder;
pub mod error;
pub mod event;
pub mod kafka;
pub mod source;

pub use config::EventsConfig;
pub use consumer::{ConsumerHandle, ConsumerState, InvalidationConsumer, RecordHandler};
pub use decoder::{AvroSchemaDecoder, DecodedRecord, RecordDecoder, SchemaDecoder, first_success};
pub use error::{ConsumerError, DecodeError};
pub use event::{ChangeEvent, FOLKEREGISTERIDENTIFIKATOR_V1};
pub use kafka::KafkaRecordSource;
pub use source::{RawRecord, RecordSource};
