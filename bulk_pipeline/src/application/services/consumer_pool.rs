// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Consumer Worker Pool (C4)
//!
//! Pulls chunks off the durable log under the fixed consumer group
//! `bulk-consumers`, drives per-record processing through the
//! `RecordProcessor` port, classifies outcomes against the taxonomy, and
//! advances the tracking store before acknowledging (§4.3).

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use bulk_pipeline_domain::{BulkEvent, Delivery, DurableLog, ErrorCode, PipelineConfig, PipelineError, RecordProcessor, TrackingStore};

use crate::application::services::retry_controller::RetryController;

pub const CONSUMER_GROUP: &str = "bulk-consumers";

/// Terminal state a processed chunk can end in — mirrors the state
/// machine's terminal markers for observability/tests, not a type the
/// caller branches on beyond logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOutcome {
    CancelledSkip,
    AllDone,
    Aborted,
}

/// A single per-record classification outcome (§4.3's table).
enum RecordOutcome {
    Skipped { reason: &'static str },
    Failure { code: ErrorCode, message: String },
    Abort(PipelineError),
}

pub struct ConsumerPool {
    config: PipelineConfig,
    durable_log: Arc<dyn DurableLog>,
    tracking_store: Arc<dyn TrackingStore>,
    record_processor: Arc<dyn RecordProcessor>,
    retry_controller: RetryController,
    topic: String,
}

impl ConsumerPool {
    pub fn new(
        config: PipelineConfig,
        durable_log: Arc<dyn DurableLog>,
        tracking_store: Arc<dyn TrackingStore>,
        record_processor: Arc<dyn RecordProcessor>,
        topic: impl Into<String>,
    ) -> Self {
        let retry_controller =
            RetryController::new(config.clone(), durable_log.clone(), topic.clone().into()).with_tracking_store(tracking_store.clone());
        Self {
            config,
            durable_log,
            tracking_store,
            record_processor,
            retry_controller,
            topic: topic.into(),
        }
    }

    /// Polls up to `MAX_POLL_RECORDS` deliveries and processes them with
    /// up to `CONCURRENCY` chunks in flight at once (§5: "no order
    /// guarantee across chunks of the same batch — two chunks may be
    /// processed concurrently ... and complete in any order"). Returns
    /// one outcome per delivery processed, in completion order.
    pub async fn poll_and_process(&self) -> Result<Vec<ChunkOutcome>, PipelineError> {
        let deliveries = self
            .durable_log
            .poll(&self.topic, CONSUMER_GROUP, self.config.max_poll_records)
            .await?;
        let concurrency = self.config.concurrency.max(1);
        let outcomes = stream::iter(deliveries)
            .map(|delivery| self.process_delivery(delivery))
            .buffer_unordered(concurrency)
            .collect::<Vec<_>>()
            .await;
        Ok(outcomes)
    }

    /// Drives one delivery through the full per-chunk state machine
    /// (§4.3). Never returns an `Err` — an ABORT transition is handled
    /// internally by invoking the retry controller, matching the delivery
    /// substrate's role of catching what the consumer re-raises.
    async fn process_delivery(&self, delivery: Delivery) -> ChunkOutcome {
        let attempt = delivery.attempt;
        let event = delivery.event;

        // RECEIVED -> VALIDATED: the envelope's types already guarantee
        // non-null batch_id and a present (possibly empty) records list,
        // so this stage is satisfied by construction; kept as an explicit
        // step to match the state machine's shape and give per-chunk
        // tests a named stage to assert against.

        // VALIDATED -> TRACKED
        if let Err(err) = self
            .tracking_store
            .initialize(&event.batch_id, event.total_chunks, event.records.len() as u64, &event.submitted_by, &event.source_filename)
            .await
        {
            tracing::warn!(batch_id = %event.batch_id, error = %err, "tracking store initialize failed, continuing without tracking");
        }

        // TRACKED -> CANCELLED_SKIP
        if let Ok(Some(state)) = self.tracking_store.get(&event.batch_id).await {
            if state.status() == bulk_pipeline_domain::BatchStatus::Cancelled {
                let _ = self.durable_log.ack(&self.topic, CONSUMER_GROUP, delivery.delivery_id).await;
                return ChunkOutcome::CancelledSkip;
            }
        }

        // PROCESSING
        if let Err(abort_err) = self.process_records(&event).await {
            self.retry_controller
                .handle_abort(&self.topic, delivery.delivery_id, attempt, event, abort_err)
                .await;
            return ChunkOutcome::Aborted;
        }

        // ALL_DONE
        if let Err(err) = self.tracking_store.complete_chunk(&event.batch_id, event.chunk_index.get()).await {
            tracing::warn!(batch_id = %event.batch_id, error = %err, "tracking store complete_chunk failed");
        }
        let _ = self.durable_log.ack(&self.topic, CONSUMER_GROUP, delivery.delivery_id).await;
        ChunkOutcome::AllDone
    }

    /// Iterates records in index order, isolating each record's outcome
    /// from the others. Returns `Err` only for the ABORT path — an
    /// unexpected, retryable-per-taxonomy error that must abort the whole
    /// chunk rather than being recorded per-record.
    async fn process_records(&self, event: &BulkEvent) -> Result<(), PipelineError> {
        for record in &event.records {
            match self.record_processor.process(record).await {
                Ok(()) => {
                    if let Err(err) = self.tracking_store.record_success(&event.batch_id, record.business_key()).await {
                        tracing::warn!(batch_id = %event.batch_id, error = %err, "tracking store record_success failed");
                    }
                }
                Err(err) => match Self::classify(err) {
                    RecordOutcome::Skipped { reason } => {
                        if let Err(err) = self.tracking_store.record_skipped(&event.batch_id, record.business_key(), reason).await {
                            tracing::warn!(batch_id = %event.batch_id, error = %err, "tracking store record_skipped failed");
                        }
                    }
                    RecordOutcome::Failure { code, message } => {
                        if let Err(err) = self
                            .tracking_store
                            .record_failure(&event.batch_id, record.business_key(), code, &message)
                            .await
                        {
                            tracing::warn!(batch_id = %event.batch_id, error = %err, "tracking store record_failure failed");
                        }
                    }
                    RecordOutcome::Abort(err) => return Err(err),
                },
            }
        }
        Ok(())
    }

    /// The per-record error classification table (§4.3). A closed tagged
    /// match over the taxonomy, not open subtyping (§9).
    fn classify(err: PipelineError) -> RecordOutcome {
        match err.code {
            ErrorCode::DuplicateTicket => RecordOutcome::Skipped { reason: "duplicate business key" },
            ErrorCode::NullRequest | ErrorCode::InvalidRowData | ErrorCode::InvalidStatusTransition | ErrorCode::DatabaseError => {
                RecordOutcome::Failure { code: err.code, message: err.message }
            }
            _ if err.code.retryable() => RecordOutcome::Abort(err),
            _ => RecordOutcome::Failure {
                code: ErrorCode::ChunkProcessingFailed,
                message: err.message,
            },
        }
    }
}
