// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Retry & Dead-Letter Controller (C6)
//!
//! Invoked by the consumer pool when a chunk's processing future resolves
//! to `Err` (the ABORT transition, §4.3). Classifies the error against the
//! not-retryable class set, schedules exponential-backoff redelivery up to
//! `MAX_ATTEMPTS`, and on exhaustion publishes to `<topic>.DLT` plus
//! appends a `DltRecord` to the Tracking Store's per-topic DLT list (§4.4).

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use bulk_pipeline_domain::{BulkEvent, DltRecord, DurableLog, PipelineConfig, PipelineError, TrackingStore};

pub struct RetryController {
    config: PipelineConfig,
    durable_log: Arc<dyn DurableLog>,
    tracking_store: Option<Arc<dyn TrackingStore>>,
    topic: String,
}

impl RetryController {
    pub fn new(config: PipelineConfig, durable_log: Arc<dyn DurableLog>, topic: impl Into<String>) -> Self {
        Self {
            config,
            durable_log,
            tracking_store: None,
            topic: topic.into(),
        }
    }

    pub fn with_tracking_store(mut self, tracking_store: Arc<dyn TrackingStore>) -> Self {
        self.tracking_store = Some(tracking_store);
        self
    }

    /// The backoff for a given (1-based) attempt number, per §4.4:
    /// `interval_n = min(MAX_INTERVAL, INITIAL_INTERVAL * MULTIPLIER^n)`.
    /// `attempt` is 1 on the first delivery, so the exponent is
    /// `attempt - 1`: the first redelivery waits `INITIAL_INTERVAL`
    /// (multiplier^0), the second `INITIAL_INTERVAL * MULTIPLIER`, etc.
    fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.config.initial_interval_ms as f64 * self.config.multiplier.powi(exponent);
        let capped = millis.min(self.config.max_interval_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    /// Handles an ABORT transition for one delivery: the not-retryable
    /// class set short-circuits straight to DLT on the first failure;
    /// everything else gets exponential-backoff redelivery up to
    /// `MAX_ATTEMPTS`, then DLT on exhaustion.
    pub async fn handle_abort(&self, topic: &str, delivery_id: Uuid, attempt: u32, event: BulkEvent, error: PipelineError) {
        let consumer_group = super::consumer_pool::CONSUMER_GROUP;

        if error.code.is_not_retryable_class() {
            tracing::warn!(
                batch_id = %event.batch_id,
                chunk_index = event.chunk_index.get(),
                error = %error,
                "non-retryable error on abort, routing straight to DLT"
            );
            self.send_to_dlt(topic, &event, &error).await;
            let _ = self.durable_log.ack(topic, consumer_group, delivery_id).await;
            return;
        }

        if attempt < self.config.max_attempts {
            let backoff = self.backoff_for_attempt(attempt);
            tracing::warn!(
                batch_id = %event.batch_id,
                chunk_index = event.chunk_index.get(),
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %error,
                "retryable error on abort, scheduling redelivery"
            );
            if let Err(redeliver_err) = self.durable_log.redeliver_after(topic, consumer_group, delivery_id, backoff).await {
                tracing::error!(batch_id = %event.batch_id, error = %redeliver_err, "failed to schedule redelivery, routing to DLT");
                self.send_to_dlt(topic, &event, &error).await;
                let _ = self.durable_log.ack(topic, consumer_group, delivery_id).await;
            }
            return;
        }

        tracing::error!(
            batch_id = %event.batch_id,
            chunk_index = event.chunk_index.get(),
            max_attempts = self.config.max_attempts,
            error = %error,
            "retry attempts exhausted, routing to DLT"
        );
        self.send_to_dlt(topic, &event, &error).await;
        let _ = self.durable_log.ack(topic, consumer_group, delivery_id).await;
    }

    async fn send_to_dlt(&self, topic: &str, event: &BulkEvent, error: &PipelineError) {
        let key = event.message_key();
        let payload_snapshot = serde_json::to_value(event).unwrap_or(serde_json::Value::Null);

        if let Err(err) = self.durable_log.publish_dlt(topic, &key, event.clone()).await {
            tracing::error!(batch_id = %event.batch_id, error = %err, "publish to DLT topic failed");
        }

        if let Some(store) = &self.tracking_store {
            let record = DltRecord::new(topic, key, payload_snapshot, error.message.clone(), error.code.tag());
            if let Err(err) = store.append_dlt(topic, record).await {
                tracing::warn!(batch_id = %event.batch_id, error = %err, "tracking store append_dlt failed");
            }
        }
    }
}
