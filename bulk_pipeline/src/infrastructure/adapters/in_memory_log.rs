// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # In-Memory Durable Log
//!
//! A single-process stand-in for the partitioned, replayable durable log
//! named only by its contract in the domain layer. Partitions by a
//! hash of the publish key, tracks per-(topic, consumer_group) cursors,
//! and supports manual ack plus delayed redelivery — enough to exercise
//! the consumer pool and retry controller in tests without a broker.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use bulk_pipeline_domain::{BulkEvent, Delivery, DurableLog, PipelineError};

const PARTITION_COUNT: u32 = 8;

struct Envelope {
    delivery_id: Uuid,
    event: BulkEvent,
    partition: u32,
    attempt: u32,
    available_at: Instant,
    delivered: bool,
    acked: bool,
}

#[derive(Default)]
struct Topic {
    messages: Vec<Envelope>,
}

pub struct InMemoryDurableLog {
    topics: Mutex<HashMap<String, Topic>>,
    fail_publish: bool,
}

impl InMemoryDurableLog {
    pub fn new() -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
            fail_publish: false,
        }
    }

    /// Test seam: makes every `publish` fail, to exercise the producer's
    /// total-failure path.
    pub fn with_publish_failure(mut self) -> Self {
        self.fail_publish = true;
        self
    }

    fn partition_for(key: &str) -> u32 {
        let mut hash: u32 = 2166136261;
        for byte in key.as_bytes() {
            hash ^= *byte as u32;
            hash = hash.wrapping_mul(16777619);
        }
        hash % PARTITION_COUNT
    }

    /// Snapshot of undelivered-or-expired-redelivery message count, for
    /// assertions in tests.
    pub fn pending_count(&self, topic: &str) -> usize {
        self.topics
            .lock()
            .get(topic)
            .map(|t| t.messages.iter().filter(|m| !m.acked).count())
            .unwrap_or(0)
    }
}

impl Default for InMemoryDurableLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DurableLog for InMemoryDurableLog {
    async fn publish(&self, topic: &str, key: &str, event: BulkEvent) -> Result<(), PipelineError> {
        if self.fail_publish {
            return Err(PipelineError::kafka_producer_error("publish failure injected"));
        }
        let partition = Self::partition_for(key);
        let mut topics = self.topics.lock();
        let entry = topics.entry(topic.to_string()).or_default();
        entry.messages.push(Envelope {
            delivery_id: Uuid::new_v4(),
            event,
            partition,
            attempt: 1,
            available_at: Instant::now(),
            delivered: false,
            acked: false,
        });
        Ok(())
    }

    async fn poll(&self, topic: &str, _consumer_group: &str, max_records: usize) -> Result<Vec<Delivery>, PipelineError> {
        let mut topics = self.topics.lock();
        let Some(entry) = topics.get_mut(topic) else {
            return Ok(Vec::new());
        };
        let now = Instant::now();
        let mut out = Vec::new();
        for envelope in entry.messages.iter_mut() {
            if out.len() >= max_records {
                break;
            }
            if envelope.acked || envelope.delivered || envelope.available_at > now {
                continue;
            }
            envelope.delivered = true;
            out.push(Delivery {
                delivery_id: envelope.delivery_id,
                event: envelope.event.clone(),
                attempt: envelope.attempt,
                partition: envelope.partition,
            });
        }
        Ok(out)
    }

    async fn ack(&self, topic: &str, _consumer_group: &str, delivery_id: Uuid) -> Result<(), PipelineError> {
        let mut topics = self.topics.lock();
        if let Some(entry) = topics.get_mut(topic) {
            if let Some(envelope) = entry.messages.iter_mut().find(|m| m.delivery_id == delivery_id) {
                envelope.acked = true;
            }
        }
        Ok(())
    }

    async fn redeliver_after(
        &self,
        topic: &str,
        _consumer_group: &str,
        delivery_id: Uuid,
        backoff: Duration,
    ) -> Result<(), PipelineError> {
        let mut topics = self.topics.lock();
        if let Some(entry) = topics.get_mut(topic) {
            if let Some(envelope) = entry.messages.iter_mut().find(|m| m.delivery_id == delivery_id) {
                envelope.delivered = false;
                envelope.attempt += 1;
                envelope.available_at = Instant::now() + backoff;
            }
        }
        Ok(())
    }

    async fn publish_dlt(&self, topic: &str, key: &str, event: BulkEvent) -> Result<(), PipelineError> {
        let dlt_topic = format!("{topic}.DLT");
        self.publish(&dlt_topic, key, event).await
    }
}
