use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{BatchId, BatchStatus, FailureRecord};

/// The aggregate root tracked store implementations converge per-chunk
/// outcomes into (§3). All mutation goes through the methods below so the
/// invariants in §8 hold at every observable point; concurrent-safe access
/// (the "atomic" requirement of §4.5) is the responsibility of the
/// `TrackingStore` adapter wrapping this type, not of `BatchState` itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchState {
    batch_id: BatchId,
    status: BatchStatus,
    total_chunks: u32,
    completed_chunk_indices: HashSet<u32>,
    total_records: u64,
    success_count: u64,
    failure_count: u64,
    skipped_count: u64,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    submitted_by: String,
    source_filename: String,
    failures: Vec<FailureRecord>,
}

impl BatchState {
    /// `TrackingStore::initialize` constructs one of these the first time
    /// any worker references a `batch_id` (§4.5: idempotent, first-arrival
    /// wins). Status starts `IN_PROGRESS` — the `ACCEPTED` status shown to
    /// the HTTP caller is a pre-tracking-store DTO default, not a stored
    /// field (see C10 note in §4.7).
    pub fn new(
        batch_id: BatchId,
        total_chunks: u32,
        total_records: u64,
        submitted_by: impl Into<String>,
        source_filename: impl Into<String>,
    ) -> Self {
        Self {
            batch_id,
            status: BatchStatus::InProgress,
            total_chunks,
            completed_chunk_indices: HashSet::new(),
            total_records,
            success_count: 0,
            failure_count: 0,
            skipped_count: 0,
            started_at: Utc::now(),
            ended_at: None,
            submitted_by: submitted_by.into(),
            source_filename: source_filename.into(),
            failures: Vec::new(),
        }
    }

    /// Rehydrates a `BatchState` from a durable backing store's row shape.
    /// Bypasses the invariant-preserving mutation methods because a stored
    /// row is assumed to already satisfy them — used only by
    /// `TrackingStore` adapters reading their own writes back.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        batch_id: BatchId,
        status: BatchStatus,
        total_chunks: u32,
        completed_chunk_indices: HashSet<u32>,
        total_records: u64,
        success_count: u64,
        failure_count: u64,
        skipped_count: u64,
        started_at: DateTime<Utc>,
        ended_at: Option<DateTime<Utc>>,
        submitted_by: impl Into<String>,
        source_filename: impl Into<String>,
        failures: Vec<FailureRecord>,
    ) -> Self {
        Self {
            batch_id,
            status,
            total_chunks,
            completed_chunk_indices,
            total_records,
            success_count,
            failure_count,
            skipped_count,
            started_at,
            ended_at,
            submitted_by: submitted_by.into(),
            source_filename: source_filename.into(),
            failures,
        }
    }

    /// The completed-chunk set as a plain vector, for adapters that
    /// serialize it (sqlite stores it as a JSON array column).
    pub fn completed_chunk_indices_vec(&self) -> Vec<u32> {
        self.completed_chunk_indices.iter().copied().collect()
    }

    pub fn batch_id(&self) -> &BatchId {
        &self.batch_id
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    pub fn completed_chunks(&self) -> u32 {
        self.completed_chunk_indices.len() as u32
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped_count
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn submitted_by(&self) -> &str {
        &self.submitted_by
    }

    pub fn source_filename(&self) -> &str {
        &self.source_filename
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// No-op once the batch is terminal — terminal states are absorbing
    /// (§8 invariant 3).
    pub fn record_success(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, failure: FailureRecord) {
        if self.is_terminal() {
            return;
        }
        self.failure_count += 1;
        self.failures.push(failure);
    }

    pub fn record_skipped(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.skipped_count += 1;
    }

    pub fn list_failures(&self, offset: usize, limit: usize) -> &[FailureRecord] {
        if offset >= self.failures.len() {
            return &[];
        }
        let end = (offset + limit).min(self.failures.len());
        &self.failures[offset..end]
    }

    /// Adds `chunk_index` to the completed set and, once every chunk has
    /// reported in, derives the terminal status from the counters
    /// (§4.5). Both the insertion and the derivation happen under one
    /// call so two concurrent completions can't both observe "last
    /// chunk" (§9, "Concurrency control for counters").
    pub fn complete_chunk(&mut self, chunk_index: u32) {
        if self.is_terminal() {
            return;
        }
        self.completed_chunk_indices.insert(chunk_index);
        if self.completed_chunks() >= self.total_chunks {
            self.status = if self.failure_count == 0 {
                BatchStatus::Completed
            } else if self.success_count == 0 {
                BatchStatus::Failed
            } else {
                BatchStatus::PartiallyCompleted
            };
            self.ended_at = Some(Utc::now());
        }
    }

    /// Idempotent: cancelling an already-terminal batch is a no-op,
    /// matching §8's idempotence requirement for `cancel`.
    pub fn cancel(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.status = BatchStatus::Cancelled;
        self.ended_at = Some(Utc::now());
    }

    /// Checks the §8 invariants. Used by property tests; cheap enough to
    /// also assert from adapters in debug builds if desired.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.success_count + self.failure_count + self.skipped_count > self.total_records {
            return Err("success+failure+skipped exceeds total_records".into());
        }
        if self.completed_chunks() > self.total_chunks {
            return Err("completed_chunks exceeds total_chunks".into());
        }
        if self.is_terminal() != self.ended_at.is_some() {
            return Err("ended_at must be set iff status is terminal".into());
        }
        if let Some(ended_at) = self.ended_at {
            if self.started_at > ended_at {
                return Err("started_at must precede ended_at".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn state(total_chunks: u32, total_records: u64) -> BatchState {
        BatchState::new(
            BatchId::new("BATCH-1-aaaaaaaa").unwrap(),
            total_chunks,
            total_records,
            "system",
            "file.csv",
        )
    }

    #[test]
    fn all_successes_completes() {
        let mut s = state(1, 3);
        s.record_success();
        s.record_success();
        s.record_success();
        s.complete_chunk(0);
        assert_eq!(s.status(), BatchStatus::Completed);
        assert!(s.ended_at().is_some());
    }

    #[test]
    fn all_failures_fails() {
        let mut s = state(1, 2);
        s.record_failure(FailureRecord::new("TKT-1", ErrorCode::DatabaseError, "boom"));
        s.record_failure(FailureRecord::new("TKT-2", ErrorCode::DatabaseError, "boom"));
        s.complete_chunk(0);
        assert_eq!(s.status(), BatchStatus::Failed);
    }

    #[test]
    fn mixed_outcomes_partially_completes() {
        let mut s = state(1, 2);
        s.record_success();
        s.record_failure(FailureRecord::new("TKT-2", ErrorCode::DatabaseError, "boom"));
        s.complete_chunk(0);
        assert_eq!(s.status(), BatchStatus::PartiallyCompleted);
    }

    #[test]
    fn empty_chunk_completes_without_incrementing_counters() {
        let mut s = state(1, 0);
        s.complete_chunk(0);
        assert_eq!(s.status(), BatchStatus::Completed);
        assert_eq!(s.success_count(), 0);
    }

    #[test]
    fn terminal_state_absorbs_further_mutation() {
        let mut s = state(1, 1);
        s.record_success();
        s.complete_chunk(0);
        assert_eq!(s.status(), BatchStatus::Completed);

        s.record_failure(FailureRecord::new("TKT-1", ErrorCode::DatabaseError, "late"));
        assert_eq!(s.failure_count(), 0, "terminal state must not accept further writes");
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut s = state(2, 2);
        s.cancel();
        let ended_first = s.ended_at();
        s.cancel();
        assert_eq!(s.status(), BatchStatus::Cancelled);
        assert_eq!(s.ended_at(), ended_first);
    }

    #[test]
    fn complete_chunk_is_monotonic_regardless_of_call_order() {
        let mut a = state(2, 2);
        a.record_success();
        a.record_success();
        a.complete_chunk(0);
        a.complete_chunk(1);

        let mut b = state(2, 2);
        b.record_success();
        b.record_success();
        b.complete_chunk(1);
        b.complete_chunk(0);

        assert_eq!(a.status(), b.status());
        assert_eq!(a.completed_chunks(), b.completed_chunks());
    }

    #[test]
    fn invariants_hold_through_a_full_lifecycle() {
        let mut s = state(2, 3);
        s.check_invariants().unwrap();
        s.record_success();
        s.record_failure(FailureRecord::new("TKT-2", ErrorCode::DatabaseError, "boom"));
        s.complete_chunk(0);
        s.check_invariants().unwrap();
        s.record_success();
        s.complete_chunk(1);
        s.check_invariants().unwrap();
        assert_eq!(s.status(), BatchStatus::PartiallyCompleted);
    }
}
