// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Dead-Letter Inspection Use Case (C10)
//!
//! `GET /api/tickets/bulk/dlt?topic=&limit=`: an insertion-order snapshot
//! of a topic's dead-letter list. Also hosts the DLT-reprocess endpoint
//! placeholder (§9, Open Question): present in the query surface, but a
//! typed "not implemented" signal until a reprocessing policy is defined —
//! the separate DLT consumer only records arrivals, it never reprocesses
//! (§4.4).

use std::sync::Arc;

use bulk_pipeline_domain::{DltRecord, PipelineError, TrackingStore};

use crate::application::dto::DltPage;

pub struct DltInspectUseCase {
    tracking_store: Arc<dyn TrackingStore>,
}

impl DltInspectUseCase {
    pub fn new(tracking_store: Arc<dyn TrackingStore>) -> Self {
        Self { tracking_store }
    }

    pub async fn list(&self, topic: &str, limit: usize) -> Result<DltPage, PipelineError> {
        let records = self.tracking_store.list_dlt(topic, limit).await?;
        Ok(DltPage {
            topic: topic.to_string(),
            records,
        })
    }

    /// Always fails with `NotImplemented` — see the module doc comment.
    pub async fn reprocess(&self, _topic: &str, _message_key: &str) -> Result<DltRecord, PipelineError> {
        Err(PipelineError::not_implemented(
            "DLT reprocessing is not supported until a reprocessing policy is defined",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::InMemoryTrackingStore;

    #[tokio::test]
    async fn lists_dlt_records_for_a_topic() {
        let store = Arc::new(InMemoryTrackingStore::new());
        store
            .append_dlt("ticket.bulk.requests", DltRecord::new("ticket.bulk.requests", "k1", serde_json::json!({}), "boom", "I3001"))
            .await
            .unwrap();

        let use_case = DltInspectUseCase::new(store);
        let page = use_case.list("ticket.bulk.requests", 10).await.unwrap();
        assert_eq!(page.records.len(), 1);
    }

    #[tokio::test]
    async fn reprocess_is_always_not_implemented() {
        let store = Arc::new(InMemoryTrackingStore::new());
        let use_case = DltInspectUseCase::new(store);
        let err = use_case.reprocess("ticket.bulk.requests", "k1").await.unwrap_err();
        assert_eq!(err.code.tag(), "E9004");
    }
}
