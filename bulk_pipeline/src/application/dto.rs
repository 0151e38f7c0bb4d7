//! # External response DTOs (§6)
//!
//! The shapes the (out-of-scope) HTTP surface would serialize. Built here
//! because the use cases that populate them are in-core; the routing,
//! multipart decoding, and response-status mapping are not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bulk_pipeline_domain::{BatchState, BatchStatus, DltRecord, ErrorCode, FailureRecord};

/// `POST /api/tickets/bulk/upload` success body (HTTP 202).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAcceptedResponse {
    pub batch_id: String,
    pub status: BatchStatus,
    pub total_records: usize,
    pub total_chunks: u32,
    pub accepted_at: DateTime<Utc>,
    pub status_url: String,
    pub failures_url: String,
}

/// A single row-level problem surfaced in a 400 response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    pub row_number: usize,
    pub column: Option<String>,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub rows_seen: usize,
    pub accepted: usize,
    pub row_errors: Vec<RowError>,
}

impl ValidationReport {
    pub fn new(rows_seen: usize) -> Self {
        Self {
            rows_seen,
            accepted: 0,
            row_errors: Vec::new(),
        }
    }
}

/// `GET /api/tickets/bulk/status/{batchId}` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatusResponse {
    pub batch_id: String,
    pub status: BatchStatus,
    pub total_chunks: u32,
    pub completed_chunks: u32,
    pub total_records: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub skipped_count: u64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<&BatchState> for BatchStatusResponse {
    fn from(state: &BatchState) -> Self {
        Self {
            batch_id: state.batch_id().to_string(),
            status: state.status(),
            total_chunks: state.total_chunks(),
            completed_chunks: state.completed_chunks(),
            total_records: state.total_records(),
            success_count: state.success_count(),
            failure_count: state.failure_count(),
            skipped_count: state.skipped_count(),
            started_at: state.started_at(),
            ended_at: state.ended_at(),
        }
    }
}

/// `GET /api/tickets/bulk/failures/{batchId}?page=&size=` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailurePage {
    pub batch_id: String,
    pub page: usize,
    pub size: usize,
    pub failures: Vec<FailureRecord>,
}

/// `GET /api/tickets/bulk/active` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveBatchesResponse {
    pub batch_ids: Vec<String>,
}

/// `POST /api/tickets/bulk/cancel/{batchId}?reason=` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub batch_id: String,
    pub advisory: bool,
    pub status: BatchStatus,
}

/// `GET /api/tickets/bulk/dlt?topic=&limit=` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DltPage {
    pub topic: String,
    pub records: Vec<DltRecord>,
}
