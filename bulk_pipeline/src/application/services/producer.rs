// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Partitioner / Producer (C2)
//!
//! Splits a validated `Record` sequence into fixed-size ordered chunks,
//! mints a `batch_id`, and publishes each chunk to the durable log with
//! idempotent semantics (§4.2).

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use rand::Rng;

use bulk_pipeline_domain::{BatchId, BulkEvent, Chunk, ChunkIndex, DurableLog, PipelineConfig, PipelineError, Record};

/// The injectable partition-key strategy (§4.2, §9: "a stronger
/// alternative (customer-id keying) is deliberately not chosen here ...
/// recorded as an open decision"). `ChunkKeyStrategy` is the configured
/// default; `CustomerIdKeyStrategy` is kept as a concrete, tested
/// alternative rather than a comment.
pub trait PartitionKeyStrategy: Send + Sync {
    fn key(&self, chunk: &Chunk) -> String;
}

pub struct ChunkKeyStrategy;

impl PartitionKeyStrategy for ChunkKeyStrategy {
    fn key(&self, chunk: &Chunk) -> String {
        chunk.chunk_key()
    }
}

/// Not wired in by default — kept as the documented open alternative.
pub struct CustomerIdKeyStrategy;

impl PartitionKeyStrategy for CustomerIdKeyStrategy {
    fn key(&self, chunk: &Chunk) -> String {
        chunk
            .records()
            .first()
            .map(|r| r.customer_id().to_string())
            .unwrap_or_else(|| chunk.chunk_key())
    }
}

pub struct Producer {
    config: PipelineConfig,
    durable_log: Arc<dyn DurableLog>,
    topic: String,
    partition_key: Arc<dyn PartitionKeyStrategy>,
}

/// Outcome of a submission's publish phase — C2 returns the minted
/// `batch_id` even when some chunks failed to publish (§4.2, point 4);
/// the Tracking Store reflects only the surviving chunks.
pub struct PublishOutcome {
    pub batch_id: BatchId,
    pub total_chunks: u32,
    pub total_records: usize,
    pub chunks_published: u32,
    pub chunks_failed: u32,
}

impl Producer {
    pub fn new(config: PipelineConfig, durable_log: Arc<dyn DurableLog>, topic: impl Into<String>) -> Self {
        Self {
            config,
            durable_log,
            topic: topic.into(),
            partition_key: Arc::new(ChunkKeyStrategy),
        }
    }

    pub fn with_partition_key_strategy(mut self, strategy: Arc<dyn PartitionKeyStrategy>) -> Self {
        self.partition_key = strategy;
        self
    }

    fn mint_batch_id() -> BatchId {
        let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let suffix: String = rand::rng()
            .sample_iter(rand::distr::Alphanumeric)
            .take(8)
            .map(char::from)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        BatchId::new(format!("BATCH-{millis}-{suffix}")).expect("well-formed by construction")
    }

    /// Splits `records` into `CHUNK_SIZE` chunks and publishes each to the
    /// configured topic. Fire-and-trace (§4.2, point 4): every chunk is
    /// attempted; total failure of every chunk is raised as
    /// `KAFKA_PRODUCER_ERROR`, but partial failure still returns the
    /// `batch_id` — surviving chunks will still be tracked.
    pub async fn submit(
        &self,
        records: Vec<Record>,
        submitted_by: &str,
        source_filename: &str,
    ) -> Result<PublishOutcome, PipelineError> {
        let batch_id = Self::mint_batch_id();
        let chunk_size = self.config.chunk_size.max(1);
        let total_records = records.len();
        let total_chunks = total_records.div_ceil(chunk_size).max(1) as u32;

        let mut chunks_published = 0u32;
        let mut chunks_failed = 0u32;
        let now = Utc::now();

        for (chunk_index, chunk_records) in records.chunks(chunk_size).enumerate() {
            let chunk = Chunk::new(
                batch_id.clone(),
                ChunkIndex(chunk_index as u32),
                total_chunks,
                chunk_records.to_vec(),
            )?;
            let key = self.partition_key.key(&chunk);
            let event = BulkEvent::new(
                batch_id.clone(),
                chunk.chunk_index(),
                total_chunks,
                chunk_records.to_vec(),
                submitted_by,
                source_filename,
                now,
            );

            match self.durable_log.publish(&self.topic, &key, event).await {
                Ok(()) => chunks_published += 1,
                Err(err) => {
                    tracing::warn!(batch_id = %batch_id, chunk_index, error = %err, "chunk publish failed");
                    chunks_failed += 1;
                }
            }
        }

        // Degenerate case: zero records still mints one empty chunk so the
        // Tracking Store has something to converge against (§8, "A chunk
        // containing an empty record list → VALIDATED, completion recorded").
        if total_records == 0 {
            let chunk = Chunk::new(batch_id.clone(), ChunkIndex(0), total_chunks, vec![])?;
            let key = self.partition_key.key(&chunk);
            let event = BulkEvent::new(batch_id.clone(), ChunkIndex(0), total_chunks, vec![], submitted_by, source_filename, now);
            match self.durable_log.publish(&self.topic, &key, event).await {
                Ok(()) => chunks_published += 1,
                Err(_) => chunks_failed += 1,
            }
        }

        if chunks_published == 0 && chunks_failed > 0 {
            return Err(PipelineError::kafka_producer_error(format!(
                "all {chunks_failed} chunk(s) failed to publish for batch {batch_id}"
            )));
        }

        Ok(PublishOutcome {
            batch_id,
            total_chunks,
            total_records,
            chunks_published,
            chunks_failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::in_memory_log::InMemoryDurableLog;

    fn record(key: &str) -> Record {
        Record::new(key, "Title", 1).unwrap()
    }

    #[tokio::test]
    async fn splits_350_records_into_four_chunks() {
        let log = Arc::new(InMemoryDurableLog::new());
        let producer = Producer::new(PipelineConfig::default(), log, "ticket.bulk.requests");
        let records: Vec<Record> = (0..350).map(|i| record(&format!("TKT-{i:04}"))).collect();
        let outcome = producer.submit(records, "system", "file.csv").await.unwrap();
        assert_eq!(outcome.total_chunks, 4);
        assert_eq!(outcome.chunks_published, 4);
    }

    #[tokio::test]
    async fn batch_id_has_the_spec_shape() {
        let log = Arc::new(InMemoryDurableLog::new());
        let producer = Producer::new(PipelineConfig::default(), log, "ticket.bulk.requests");
        let outcome = producer.submit(vec![record("TKT-1")], "system", "file.csv").await.unwrap();
        assert!(outcome.batch_id.as_str().starts_with("BATCH-"));
    }

    #[tokio::test]
    async fn all_chunks_failing_raises_kafka_producer_error() {
        let log = Arc::new(InMemoryDurableLog::new().with_publish_failure());
        let producer = Producer::new(PipelineConfig::default(), log, "ticket.bulk.requests");
        let err = producer.submit(vec![record("TKT-1")], "system", "file.csv").await.unwrap_err();
        assert_eq!(err.code.tag(), "K4001");
    }
}
