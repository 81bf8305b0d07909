//! Multi-generation Avro decoding.
//!
//! Payloads carry a 5-byte framing prefix (magic byte plus a 4-byte schema
//! registry id). The prefix is skipped unread; the schema is found by trial
//! over the known generations instead.
//!
//! The embedded reader schemas are hand-maintained copies of the V2, V3 and
//! V4 `Personhendelse` generations; see `schemas/README.md` for what each
//! one covers and how to replace them when a payload stops decoding.

use apache_avro::Schema;
use apache_avro::types::Value;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::DecodeError;

/// Magic byte plus 4-byte schema id.
pub const FRAMING_PREFIX_LEN: usize = 5;

const PERSONHENDELSE_V2: &str = include_str!("../schemas/personhendelse_v2.avsc");
const PERSONHENDELSE_V3: &str = include_str!("../schemas/personhendelse_v3.avsc");
const PERSONHENDELSE_V4: &str = include_str!("../schemas/personhendelse_v4.avsc");

/// Decodes an unframed datum under one schema generation.
pub trait RecordDecoder: Send + Sync {
    fn version(&self) -> &str;

    fn decode(&self, body: &[u8]) -> Result<Value, DecodeError>;
}

/// A record together with the schema generation that decoded it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub version: String,
    pub value: Value,
}

/// [`RecordDecoder`] for one embedded Avro schema.
pub struct AvroSchemaDecoder {
    version: String,
    schema: Schema,
}

impl AvroSchemaDecoder {
    pub fn new(version: impl Into<String>, schema_json: &str) -> Result<Self, DecodeError> {
        let version = version.into();
        let schema = Schema::parse_str(schema_json).map_err(|source| DecodeError::InvalidSchema {
            version: version.clone(),
            source,
        })?;
        Ok(Self { version, schema })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl RecordDecoder for AvroSchemaDecoder {
    fn version(&self) -> &str {
        &self.version
    }

    /// The datum must consume the whole body; leftovers mean the payload was
    /// written with a different generation.
    fn decode(&self, body: &[u8]) -> Result<Value, DecodeError> {
        let mut reader = body;
        let value = apache_avro::from_avro_datum(&self.schema, &mut reader, None).map_err(
            |source| DecodeError::Mismatch {
                version: self.version.clone(),
                source,
            },
        )?;

        if !reader.is_empty() {
            return Err(DecodeError::TrailingBytes {
                version: self.version.clone(),
                trailing: reader.len(),
            });
        }
        Ok(value)
    }
}

/// Run `attempt` over `candidates` in order and return the first success.
///
/// When every attempt fails the last error is returned. `None` means there
/// were no candidates.
pub fn first_success<I, T, E, F>(candidates: I, mut attempt: F) -> Option<Result<T, E>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Result<T, E>,
{
    let mut last = None;
    for candidate in candidates {
        match attempt(candidate) {
            Ok(value) => return Some(Ok(value)),
            Err(e) => last = Some(Err(e)),
        }
    }
    last
}

/// Ordered, newest-first list of schema generations.
pub struct SchemaDecoder {
    decoders: Vec<Box<dyn RecordDecoder>>,
}

impl SchemaDecoder {
    pub fn new(decoders: Vec<Box<dyn RecordDecoder>>) -> Self {
        Self { decoders }
    }

    /// Decoder for every known `Personhendelse` generation.
    pub fn personhendelse() -> Result<Self, DecodeError> {
        Ok(Self::new(vec![
            Box::new(AvroSchemaDecoder::new("V4", PERSONHENDELSE_V4)?),
            Box::new(AvroSchemaDecoder::new("V3", PERSONHENDELSE_V3)?),
            Box::new(AvroSchemaDecoder::new("V2", PERSONHENDELSE_V2)?),
        ]))
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.decoders.iter().map(|d| d.version())
    }

    /// Decode a framed payload.
    pub fn decode(&self, raw: &[u8]) -> Result<DecodedRecord, DecodeError> {
        let body = raw
            .get(FRAMING_PREFIX_LEN..)
            .ok_or(DecodeError::TooShort {
                len: raw.len(),
                prefix: FRAMING_PREFIX_LEN,
            })?;

        first_success(&self.decoders, |decoder| {
            decoder
                .decode(body)
                .map(|value| DecodedRecord {
                    version: decoder.version().to_string(),
                    value,
                })
                .inspect_err(|e| {
                    tracing::warn!(version = decoder.version(), error = %e, "Failed to decode record");
                    tracing::debug!(
                        version = decoder.version(),
                        payload = %BASE64.encode(raw),
                        "Undecodable payload"
                    );
                })
        })
        .unwrap_or(Err(DecodeError::NoSchemas))
    }
}
