use std::time::Duration;

use async_trait::async_trait;

use crate::error::ConsumerError;

/// A record as read off the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Tombstones carry no payload.
    pub payload: Option<Vec<u8>>,
}

/// Transport the invalidation consumer polls.
///
/// `poll` must be cancel-safe: the consumer drops an in-flight poll on stop.
#[async_trait]
pub trait RecordSource: Send {
    /// Wait up to `timeout` for the next record. `Ok(None)` means nothing
    /// arrived in time. [`ConsumerError::Transient`] is logged and the
    /// consumer polls again; any other error ends the consumer.
    async fn poll(&mut self, timeout: Duration) -> Result<Option<RawRecord>, ConsumerError>;
}
