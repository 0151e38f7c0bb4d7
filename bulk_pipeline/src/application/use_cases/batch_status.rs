// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Batch Status Use Case (C10)
//!
//! `GET /api/tickets/bulk/status/{batchId}`: a read-only snapshot of the
//! Tracking Store's `BatchState`, shaped into the external DTO. Status is
//! always read from stored fields, never recomputed from the chunk list
//! (§4.7).

use std::sync::Arc;

use bulk_pipeline_domain::{BatchId, PipelineError, TrackingStore};

use crate::application::dto::BatchStatusResponse;

pub struct BatchStatusUseCase {
    tracking_store: Arc<dyn TrackingStore>,
}

impl BatchStatusUseCase {
    pub fn new(tracking_store: Arc<dyn TrackingStore>) -> Self {
        Self { tracking_store }
    }

    /// `Ok(None)` is the 404 case — no batch with this id has been seen
    /// by any worker yet (or it has expired past its TTL).
    pub async fn execute(&self, batch_id: &BatchId) -> Result<Option<BatchStatusResponse>, PipelineError> {
        Ok(self.tracking_store.get(batch_id).await?.as_ref().map(BatchStatusResponse::from))
    }
}
