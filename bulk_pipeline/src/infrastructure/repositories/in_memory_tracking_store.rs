// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # In-Memory Tracking Store
//!
//! A single-process `TrackingStore` guarded by one lock per batch plus a
//! registry lock, standing in for the distributed, atomically-updated
//! keyspace the domain layer names only by contract. Exercises the
//! absorbing-terminal-state and idempotent-initialize contracts the
//! consumer pool depends on.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use bulk_pipeline_domain::{
    BatchId, BatchState, DltRecord, ErrorCode, FailureRecord, PipelineError, TrackingStore,
};

#[derive(Default)]
pub struct InMemoryTrackingStore {
    batches: RwLock<HashMap<BatchId, Arc<RwLock<BatchState>>>>,
    dlt: RwLock<HashMap<String, Vec<DltRecord>>>,
}

impl InMemoryTrackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn batch(&self, batch_id: &BatchId) -> Result<Arc<RwLock<BatchState>>, PipelineError> {
        self.batches
            .read()
            .get(batch_id)
            .cloned()
            .ok_or_else(|| PipelineError::new(ErrorCode::DatabaseError, format!("unknown batch '{batch_id}'")))
    }
}

#[async_trait]
impl TrackingStore for InMemoryTrackingStore {
    async fn initialize(
        &self,
        batch_id: &BatchId,
        total_chunks: u32,
        total_records: u64,
        submitted_by: &str,
        source_filename: &str,
    ) -> Result<(), PipelineError> {
        let mut batches = self.batches.write();
        batches.entry(batch_id.clone()).or_insert_with(|| {
            Arc::new(RwLock::new(BatchState::new(
                batch_id.clone(),
                total_chunks,
                total_records,
                submitted_by,
                source_filename,
            )))
        });
        Ok(())
    }

    async fn record_success(&self, batch_id: &BatchId, _business_key: &str) -> Result<(), PipelineError> {
        self.batch(batch_id)?.write().record_success();
        Ok(())
    }

    async fn record_failure(
        &self,
        batch_id: &BatchId,
        business_key: &str,
        error_code: ErrorCode,
        message: &str,
    ) -> Result<(), PipelineError> {
        self.batch(batch_id)?
            .write()
            .record_failure(FailureRecord::new(business_key, error_code, message));
        Ok(())
    }

    async fn record_skipped(&self, batch_id: &BatchId, _business_key: &str, _reason: &str) -> Result<(), PipelineError> {
        self.batch(batch_id)?.write().record_skipped();
        Ok(())
    }

    async fn complete_chunk(&self, batch_id: &BatchId, chunk_index: u32) -> Result<(), PipelineError> {
        self.batch(batch_id)?.write().complete_chunk(chunk_index);
        Ok(())
    }

    async fn cancel(&self, batch_id: &BatchId, _reason: &str) -> Result<(), PipelineError> {
        self.batch(batch_id)?.write().cancel();
        Ok(())
    }

    async fn get(&self, batch_id: &BatchId) -> Result<Option<BatchState>, PipelineError> {
        Ok(self.batches.read().get(batch_id).map(|s| s.read().clone()))
    }

    async fn list_active(&self) -> Result<Vec<BatchId>, PipelineError> {
        Ok(self
            .batches
            .read()
            .iter()
            .filter(|(_, state)| !state.read().is_terminal())
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn list_failures(
        &self,
        batch_id: &BatchId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<FailureRecord>, PipelineError> {
        Ok(self.batch(batch_id)?.read().list_failures(offset, limit).to_vec())
    }

    async fn append_dlt(&self, topic: &str, record: DltRecord) -> Result<(), PipelineError> {
        self.dlt.write().entry(topic.to_string()).or_default().push(record);
        Ok(())
    }

    async fn list_dlt(&self, topic: &str, limit: usize) -> Result<Vec<DltRecord>, PipelineError> {
        Ok(self
            .dlt
            .read()
            .get(topic)
            .map(|records| records.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_id() -> BatchId {
        BatchId::new("BATCH-1-aaaaaaaa").unwrap()
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let store = InMemoryTrackingStore::new();
        store.initialize(&batch_id(), 1, 1, "system", "file.csv").await.unwrap();
        store.record_success(&batch_id(), "TKT-1").await.unwrap();
        store.initialize(&batch_id(), 1, 1, "system", "file.csv").await.unwrap();
        let state = store.get(&batch_id()).await.unwrap().unwrap();
        assert_eq!(state.success_count(), 1, "second initialize must not reset counters");
    }

    #[tokio::test]
    async fn complete_chunk_removes_batch_from_active_set() {
        let store = InMemoryTrackingStore::new();
        store.initialize(&batch_id(), 1, 1, "system", "file.csv").await.unwrap();
        store.record_success(&batch_id(), "TKT-1").await.unwrap();
        assert_eq!(store.list_active().await.unwrap().len(), 1);
        store.complete_chunk(&batch_id(), 0).await.unwrap();
        assert!(store.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_batch_is_a_database_error() {
        let store = InMemoryTrackingStore::new();
        let err = store.record_success(&batch_id(), "TKT-1").await.unwrap_err();
        assert_eq!(err.code.tag(), "I3001");
    }

    #[tokio::test]
    async fn dlt_list_returns_insertion_order() {
        let store = InMemoryTrackingStore::new();
        store
            .append_dlt("t", DltRecord::new("t", "k1", serde_json::json!({}), "boom", "P2002"))
            .await
            .unwrap();
        store
            .append_dlt("t", DltRecord::new("t", "k2", serde_json::json!({}), "boom", "P2002"))
            .await
            .unwrap();
        let records = store.list_dlt("t", 10).await.unwrap();
        assert_eq!(records[0].message_key, "k1");
        assert_eq!(records[1].message_key, "k2");
    }
}
