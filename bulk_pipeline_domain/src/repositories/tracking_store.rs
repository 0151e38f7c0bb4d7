use async_trait::async_trait;

use crate::aggregates::BatchState;
use crate::error::{ErrorCode, PipelineError};
use crate::value_objects::{BatchId, DltRecord};

/// The Tracking Store contract (C7, §4.5): a process-wide, externally-
/// visible aggregate keyed by `batch_id`. Implementations must make every
/// method below safe for concurrent callers across workers *and*
/// processes — the counters are read-modify-write, never read-then-write
/// across an await point.
///
/// Per §4.5's failure model, callers (the consumer pool, C4) treat any
/// `Err` from this trait as "log and continue" — a tracking outage must
/// never abort chunk processing.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    /// Idempotent: a no-op if `batch_id` is already present. On creation
    /// also inserts the batch into the active-batches set.
    async fn initialize(
        &self,
        batch_id: &BatchId,
        total_chunks: u32,
        total_records: u64,
        submitted_by: &str,
        source_filename: &str,
    ) -> Result<(), PipelineError>;

    async fn record_success(&self, batch_id: &BatchId, business_key: &str) -> Result<(), PipelineError>;

    async fn record_failure(
        &self,
        batch_id: &BatchId,
        business_key: &str,
        error_code: ErrorCode,
        message: &str,
    ) -> Result<(), PipelineError>;

    async fn record_skipped(&self, batch_id: &BatchId, business_key: &str, reason: &str) -> Result<(), PipelineError>;

    /// Adds `chunk_index` to the completed set, recomputes
    /// `completed_chunks`, and — if every chunk has now reported in —
    /// derives the terminal status, stamps `ended_at`, and removes the
    /// batch from the active set (§4.5).
    async fn complete_chunk(&self, batch_id: &BatchId, chunk_index: u32) -> Result<(), PipelineError>;

    /// Idempotent: cancelling a terminal batch is a no-op. Advisory only —
    /// in-flight record processing is not interrupted (§5, §9).
    async fn cancel(&self, batch_id: &BatchId, reason: &str) -> Result<(), PipelineError>;

    async fn get(&self, batch_id: &BatchId) -> Result<Option<BatchState>, PipelineError>;

    async fn list_active(&self) -> Result<Vec<BatchId>, PipelineError>;

    async fn list_failures(
        &self,
        batch_id: &BatchId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<crate::value_objects::FailureRecord>, PipelineError>;

    /// Fire-and-forget append to a per-topic dead-letter list.
    async fn append_dlt(&self, topic: &str, record: DltRecord) -> Result<(), PipelineError>;

    async fn list_dlt(&self, topic: &str, limit: usize) -> Result<Vec<DltRecord>, PipelineError>;
}
