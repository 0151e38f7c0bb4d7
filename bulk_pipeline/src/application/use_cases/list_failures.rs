// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # List Failures Use Case (C10)
//!
//! `GET /api/tickets/bulk/failures/{batchId}?page=&size=`: paginated,
//! insertion-order failure list (§6: default page 0, size 50).

use std::sync::Arc;

use bulk_pipeline_domain::{BatchId, PipelineError, TrackingStore};

use crate::application::dto::FailurePage;

pub const DEFAULT_PAGE: usize = 0;
pub const DEFAULT_SIZE: usize = 50;

pub struct ListFailuresUseCase {
    tracking_store: Arc<dyn TrackingStore>,
}

impl ListFailuresUseCase {
    pub fn new(tracking_store: Arc<dyn TrackingStore>) -> Self {
        Self { tracking_store }
    }

    pub async fn execute(&self, batch_id: &BatchId, page: usize, size: usize) -> Result<FailurePage, PipelineError> {
        let size = size.max(1);
        let offset = page * size;
        let failures = self.tracking_store.list_failures(batch_id, offset, size).await?;
        Ok(FailurePage {
            batch_id: batch_id.to_string(),
            page,
            size,
            failures,
        })
    }
}
