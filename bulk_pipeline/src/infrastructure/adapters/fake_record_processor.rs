// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Fake Record Processor
//!
//! A `RecordProcessor` implementation for tests and the single-process
//! demo: simulates the individual-ticket creation service by business key
//! pattern rather than by calling out to a real one (which is out of
//! scope — named only by its contract).

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use bulk_pipeline_domain::{PipelineError, Record, RecordProcessor};

/// Keys containing this substring simulate a downstream failure; keys
/// already seen simulate the downstream service's own uniqueness
/// constraint.
pub const FORCE_FAILURE_MARKER: &str = "FAIL";

#[derive(Default)]
pub struct FakeRecordProcessor {
    seen: Mutex<HashSet<String>>,
}

impl FakeRecordProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.lock().len()
    }
}

#[async_trait]
impl RecordProcessor for FakeRecordProcessor {
    async fn process(&self, record: &Record) -> Result<(), PipelineError> {
        if record.business_key().contains(FORCE_FAILURE_MARKER) {
            return Err(PipelineError::new(
                bulk_pipeline_domain::ErrorCode::TicketCreationFailed,
                format!("simulated downstream failure for '{}'", record.business_key()),
            ));
        }
        let mut seen = self.seen.lock();
        if !seen.insert(record.business_key().to_string()) {
            return Err(PipelineError::duplicate_ticket(record.business_key()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn idempotent_resubmission_of_the_same_key_is_rejected() {
        let processor = FakeRecordProcessor::new();
        let record = Record::new("TKT-1", "Title", 1).unwrap();
        processor.process(&record).await.unwrap();
        let err = processor.process(&record).await.unwrap_err();
        assert_eq!(err.code.tag(), "P2001");
    }

    #[tokio::test]
    async fn marker_key_simulates_downstream_failure() {
        let processor = FakeRecordProcessor::new();
        let record = Record::new("TKT-FAIL-1", "Title", 1).unwrap();
        let err = processor.process(&record).await.unwrap_err();
        assert_eq!(err.code.tag(), "P2002");
    }
}
