// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # List Active Batches Use Case (C10)
//!
//! `GET /api/tickets/bulk/active`: the process-wide active-batches set
//! named in §3/§9 ("global mutable state ... created lazily on first
//! reference").

use std::sync::Arc;

use bulk_pipeline_domain::{PipelineError, TrackingStore};

use crate::application::dto::ActiveBatchesResponse;

pub struct ListActiveUseCase {
    tracking_store: Arc<dyn TrackingStore>,
}

impl ListActiveUseCase {
    pub fn new(tracking_store: Arc<dyn TrackingStore>) -> Self {
        Self { tracking_store }
    }

    pub async fn execute(&self) -> Result<ActiveBatchesResponse, PipelineError> {
        let batch_ids = self.tracking_store.list_active().await?.iter().map(ToString::to_string).collect();
        Ok(ActiveBatchesResponse { batch_ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::InMemoryTrackingStore;
    use bulk_pipeline_domain::BatchId;

    #[tokio::test]
    async fn completed_batches_drop_out_of_the_active_set() {
        let store = Arc::new(InMemoryTrackingStore::new());
        let running = BatchId::new("BATCH-1-aaaaaaaa").unwrap();
        let done = BatchId::new("BATCH-2-bbbbbbbb").unwrap();
        store.initialize(&running, 1, 1, "system", "a.csv").await.unwrap();
        store.initialize(&done, 1, 0, "system", "b.csv").await.unwrap();
        store.complete_chunk(&done, 0).await.unwrap();

        let use_case = ListActiveUseCase::new(store);
        let response = use_case.execute().await.unwrap();
        assert_eq!(response.batch_ids, vec![running.to_string()]);
    }
}
