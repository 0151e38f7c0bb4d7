// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Shared test harness: a full in-memory stack (durable log, tracking
//! store, record processor) plus a drain loop, so end-to-end scenario
//! tests read as "submit, drain, assert" without repeating the wiring.

use std::sync::Arc;

use bulk_pipeline::application::services::consumer_pool::ConsumerPool;
use bulk_pipeline::application::use_cases::SubmitBatchUseCase;
use bulk_pipeline::infrastructure::adapters::fake_record_processor::FakeRecordProcessor;
use bulk_pipeline::infrastructure::adapters::in_memory_log::InMemoryDurableLog;
use bulk_pipeline::infrastructure::repositories::InMemoryTrackingStore;
use bulk_pipeline::{BatchId, BatchState, PipelineConfig};
use bulk_pipeline_domain::TrackingStore;

pub const TOPIC: &str = "ticket.bulk.requests";

pub struct Harness {
    pub config: PipelineConfig,
    pub durable_log: Arc<InMemoryDurableLog>,
    pub tracking_store: Arc<InMemoryTrackingStore>,
    pub record_processor: Arc<FakeRecordProcessor>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            durable_log: Arc::new(InMemoryDurableLog::new()),
            tracking_store: Arc::new(InMemoryTrackingStore::new()),
            record_processor: Arc::new(FakeRecordProcessor::new()),
        }
    }

    pub fn with_unreachable_log(mut self) -> Self {
        self.durable_log = Arc::new(InMemoryDurableLog::new().with_publish_failure());
        self
    }

    pub fn submit_use_case(&self) -> SubmitBatchUseCase {
        SubmitBatchUseCase::new(self.config.clone(), self.durable_log.clone(), TOPIC)
    }

    pub fn consumer_pool(&self) -> ConsumerPool {
        ConsumerPool::new(
            self.config.clone(),
            self.durable_log.clone(),
            self.tracking_store.clone(),
            self.record_processor.clone(),
            TOPIC,
        )
    }

    /// Drives the consumer pool against the in-memory log until a poll
    /// returns nothing left to process — every chunk has reached a
    /// terminal per-chunk outcome or exhausted its retries to the DLT.
    pub async fn drain(&self) {
        let pool = self.consumer_pool();
        loop {
            let outcomes = pool.poll_and_process().await.expect("poll_and_process should not error");
            if outcomes.is_empty() {
                break;
            }
        }
    }

    pub async fn state(&self, batch_id: &BatchId) -> BatchState {
        self.tracking_store
            .get(batch_id)
            .await
            .expect("tracking store get should not error")
            .expect("batch should have been tracked")
    }
}

/// Builds a minimal valid CSV body with `n` rows, customer id `1000 + i`,
/// ticket numbers `TKT-{i:03}`.
pub fn csv_with_rows(n: usize) -> String {
    let mut body = String::from("ticketnumber,title,customerid\n");
    for i in 0..n {
        body.push_str(&format!("TKT-{i:03},Issue {i},{}\n", 1000 + i));
    }
    body
}
