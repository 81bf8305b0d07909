//! The invalidation consumer loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use persona_lookup::CachePurger;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::decoder::SchemaDecoder;
use crate::error::ConsumerError;
use crate::event::ChangeEvent;
use crate::source::{RawRecord, RecordSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Running,
    Stopped,
}

/// Purges cached lookups for every identifier touched by a national
/// identifier change.
///
/// Records are handled one at a time. Undecodable records, records without a
/// subject and failed purges are logged and skipped; only a transport error
/// ends the loop.
pub struct InvalidationConsumer<S> {
    source: S,
    handler: RecordHandler,
    poll_timeout: Duration,
}

impl<S: RecordSource + 'static> InvalidationConsumer<S> {
    pub fn new(
        source: S,
        decoder: Arc<SchemaDecoder>,
        purger: Arc<dyn CachePurger>,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            source,
            handler: RecordHandler { decoder, purger },
            poll_timeout,
        }
    }

    /// Start the loop in a background task.
    pub fn start(self) -> ConsumerHandle {
        let token = CancellationToken::new();
        let running = Arc::new(AtomicBool::new(true));

        let task = {
            let token = token.clone();
            let running = running.clone();
            tokio::spawn(async move {
                let result = self.run(token).await;
                running.store(false, Ordering::SeqCst);
                result
            })
        };

        ConsumerHandle {
            token,
            running,
            task: Mutex::new(Some(task)),
        }
    }

    async fn run(mut self, token: CancellationToken) -> Result<(), ConsumerError> {
        info!(poll_timeout_ms = self.poll_timeout.as_millis() as u64, "Invalidation consumer started");

        loop {
            let polled = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    info!("Invalidation consumer stopping");
                    return Ok(());
                }
                polled = self.source.poll(self.poll_timeout) => polled,
            };

            match polled {
                Ok(Some(record)) => self.handler.handle(record).await,
                Ok(None) => {}
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "Event stream unavailable, polling again");
                }
                Err(e) => {
                    error!(error = %e, "Event stream failed, invalidation consumer exiting");
                    return Err(e);
                }
            }
        }
    }
}

/// Turns one raw record into at most one purge.
pub struct RecordHandler {
    decoder: Arc<SchemaDecoder>,
    purger: Arc<dyn CachePurger>,
}

impl RecordHandler {
    pub fn new(decoder: Arc<SchemaDecoder>, purger: Arc<dyn CachePurger>) -> Self {
        Self { decoder, purger }
    }

    pub async fn handle(&self, record: RawRecord) {
        let Some(payload) = record.payload.as_deref() else {
            debug!(partition = record.partition, offset = record.offset, "Skipping record without payload");
            return;
        };

        let decoded = match self.decoder.decode(payload) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(
                    partition = record.partition,
                    offset = record.offset,
                    error = %e,
                    "Skipping undecodable record"
                );
                return;
            }
        };

        let Some(event) = ChangeEvent::from_record(&decoded.value) else {
            warn!(offset = record.offset, version = %decoded.version, "Record has no opplysningstype");
            return;
        };
        if !event.is_identifier_change() {
            return;
        }
        if event.subject.is_none() {
            warn!(offset = record.offset, "Identifier change without subject, skipping");
            return;
        }

        let trace_id = Uuid::new_v4().to_string();
        let identifiers = event.identifiers();
        info!(
            trace_id = %trace_id,
            offset = record.offset,
            identifiers = identifiers.len(),
            "Purging cache for identifier change"
        );

        if let Err(e) = self.purger.purge(&identifiers, &trace_id).await {
            error!(trace_id = %trace_id, error = %e, "Cache purge failed");
        }
    }
}

/// Control handle for a started [`InvalidationConsumer`].
pub struct ConsumerHandle {
    token: CancellationToken,
    running: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<Result<(), ConsumerError>>>>,
}

impl ConsumerHandle {
    /// Request shutdown. Interrupts an in-flight poll. Idempotent.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ConsumerState {
        if self.is_running() {
            ConsumerState::Running
        } else {
            ConsumerState::Stopped
        }
    }

    /// Wait for the loop to end and return its outcome. Later calls return
    /// `Ok(())`.
    ///
    /// Cancel-safe: dropping the future leaves the task joinable.
    pub async fn join(&self) -> Result<(), ConsumerError> {
        let mut task = self.task.lock().await;
        let Some(handle) = task.as_mut() else {
            return Ok(());
        };
        let outcome = handle.await;
        *task = None;
        outcome.map_err(|e| ConsumerError::Task(e.to_string()))?
    }
}
