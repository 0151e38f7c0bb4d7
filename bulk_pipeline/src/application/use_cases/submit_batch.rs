// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Submit Batch Use Case (C9)
//!
//! Composes the Parser (C1) and the Partitioner/Producer (C2) for a single
//! submission: parse, bulk-reject or accept, publish chunks, and return the
//! minted `batch_id` promptly (§4.7). This is the use case the out-of-scope
//! `POST /api/tickets/bulk/upload` handler would call.

use std::io::Read;
use std::sync::Arc;

use chrono::Utc;

use bulk_pipeline_domain::{DurableLog, PipelineConfig, PipelineError};

use crate::application::dto::{UploadAcceptedResponse, ValidationReport};
use crate::application::services::parser::Parser;
use crate::application::services::producer::Producer;

pub struct SubmitBatchUseCase {
    parser: Parser,
    producer: Producer,
    topic: String,
}

impl SubmitBatchUseCase {
    pub fn new(config: PipelineConfig, durable_log: Arc<dyn DurableLog>, topic: impl Into<String>) -> Self {
        let topic = topic.into();
        Self {
            parser: Parser::new(config.clone()),
            producer: Producer::new(config, durable_log, topic.clone()),
            topic,
        }
    }

    /// Runs C1 then C2 for one submission. On a parse-level rejection, the
    /// `PipelineError` carries the `V1xxx` code the HTTP boundary would map
    /// to 400; `ValidationReport` is returned alongside success so callers
    /// can still see per-row warnings (defaulted status/priority, etc.)
    /// even when the submission is accepted.
    pub async fn execute<R: Read>(
        &self,
        filename: &str,
        byte_size: u64,
        reader: R,
        submitted_by: Option<&str>,
    ) -> Result<(UploadAcceptedResponse, ValidationReport), PipelineError> {
        let submitted_by = submitted_by.filter(|s| !s.is_empty()).unwrap_or("system");
        let (records, report) = self.parser.parse(filename, byte_size, reader)?;

        // §9, last bullet: zero rows after header, under the bulk-reject
        // threshold, is still treated as EMPTY_FILE ahead of producing.
        if records.is_empty() {
            return Err(PipelineError::empty_file());
        }

        let outcome = self.producer.submit(records, submitted_by, filename).await?;

        let batch_id = outcome.batch_id.to_string();
        let response = UploadAcceptedResponse {
            status: bulk_pipeline_domain::BatchStatus::Accepted,
            total_records: outcome.total_records,
            total_chunks: outcome.total_chunks,
            accepted_at: Utc::now(),
            status_url: format!("/api/tickets/bulk/status/{batch_id}"),
            failures_url: format!("/api/tickets/bulk/failures/{batch_id}"),
            batch_id,
        };
        Ok((response, report))
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::in_memory_log::InMemoryDurableLog;

    fn use_case() -> (SubmitBatchUseCase, Arc<InMemoryDurableLog>) {
        let log = Arc::new(InMemoryDurableLog::new());
        (
            SubmitBatchUseCase::new(PipelineConfig::default(), log.clone(), "ticket.bulk.requests"),
            log,
        )
    }

    #[tokio::test]
    async fn happy_path_returns_accepted_with_one_chunk() {
        let (use_case, _log) = use_case();
        let csv = "ticketnumber,title,customerid\nTKT-001,Login,1001\nTKT-002,Reset,1002\nTKT-003,Dash,1003\n";
        let (response, report) = use_case
            .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
            .await
            .unwrap();
        assert_eq!(response.total_records, 3);
        assert_eq!(response.total_chunks, 1);
        assert_eq!(response.status, bulk_pipeline_domain::BatchStatus::Accepted);
        assert!(report.row_errors.is_empty());
    }

    #[tokio::test]
    async fn empty_submission_fails_empty_file_even_under_bulk_reject_threshold() {
        let (use_case, _log) = use_case();
        let csv = "ticketnumber,title,customerid\n";
        let err = use_case
            .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code.tag(), "V1001");
    }

    #[tokio::test]
    async fn missing_submitted_by_defaults_to_system() {
        let (use_case, log) = use_case();
        let csv = "ticketnumber,title,customerid\nTKT-001,Login,1001\n";
        use_case
            .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
            .await
            .unwrap();
        assert_eq!(log.pending_count("ticket.bulk.requests"), 1);
    }
}
