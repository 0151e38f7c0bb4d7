use async_trait::async_trait;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::value_objects::BulkEvent;

/// A message handed back by [`DurableLog::poll`]: the event plus the
/// redelivery metadata the Retry & Dead-Letter Controller (C6) needs.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Identifies this delivery attempt for `ack`; stable across
    /// redeliveries of the same underlying event so attempt counts can be
    /// tracked.
    pub delivery_id: Uuid,
    pub event: BulkEvent,
    pub attempt: u32,
    pub partition: u32,
}

/// The durable log contract (C3): a partitioned, replayable sequence of
/// events with per-partition ordering, consumer groups, and per-record
/// acknowledgment — named only by its contract, the way §1 scopes it as
/// an external collaborator. Concrete adapters (an in-memory stand-in
/// included in this workspace) implement the semantics described in §6's
/// "Durable log topology": idempotent publish, manual per-record commit,
/// a dedicated `.DLT` sub-topic.
#[async_trait]
pub trait DurableLog: Send + Sync {
    /// Publishes `event` to `topic` keyed by `key`. Must be configured for
    /// idempotent publishing so transport-level retries of the same
    /// `(producer, sequence)` pair never create duplicate events (§4.2).
    async fn publish(&self, topic: &str, key: &str, event: BulkEvent) -> Result<(), PipelineError>;

    /// Fetches up to `max_records` undelivered messages for `consumer_group`
    /// on `topic` (§5, "Backpressure": bounded by `MAX_POLL_RECORDS`).
    async fn poll(&self, topic: &str, consumer_group: &str, max_records: usize) -> Result<Vec<Delivery>, PipelineError>;

    /// Explicit per-record acknowledgment; auto-commit is disabled by
    /// contract (§4.3).
    async fn ack(&self, topic: &str, consumer_group: &str, delivery_id: Uuid) -> Result<(), PipelineError>;

    /// Schedules `event` for redelivery after the given backoff, used by
    /// the Retry & Dead-Letter Controller (C6) instead of re-publishing
    /// immediately.
    async fn redeliver_after(
        &self,
        topic: &str,
        consumer_group: &str,
        delivery_id: Uuid,
        backoff: std::time::Duration,
    ) -> Result<(), PipelineError>;

    /// Publishes an exhausted message to `<topic>.DLT` (§4.4).
    async fn publish_dlt(&self, topic: &str, key: &str, event: BulkEvent) -> Result<(), PipelineError>;
}
