// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Cancel Batch Use Case (C10)
//!
//! `POST /api/tickets/bulk/cancel/{batchId}?reason=`: idempotent,
//! advisory cancellation (§5: "in-flight records in a chunk currently
//! being processed are not interrupted").

use std::sync::Arc;

use bulk_pipeline_domain::{BatchId, BatchStatus, PipelineError, TrackingStore};

use crate::application::dto::CancelResponse;

pub struct CancelBatchUseCase {
    tracking_store: Arc<dyn TrackingStore>,
}

impl CancelBatchUseCase {
    pub fn new(tracking_store: Arc<dyn TrackingStore>) -> Self {
        Self { tracking_store }
    }

    pub async fn execute(&self, batch_id: &BatchId, reason: &str) -> Result<CancelResponse, PipelineError> {
        self.tracking_store.cancel(batch_id, reason).await?;
        let status = self
            .tracking_store
            .get(batch_id)
            .await?
            .map(|state| state.status())
            .unwrap_or(BatchStatus::Cancelled);
        Ok(CancelResponse {
            batch_id: batch_id.to_string(),
            advisory: true,
            status,
        })
    }
}
