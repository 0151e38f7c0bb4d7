// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Batch-state invariants, boundary behaviors, and idempotence properties.

mod common;

use bulk_pipeline::{BatchId, BatchStatus, PipelineConfig};
use common::{csv_with_rows, Harness};

#[tokio::test]
async fn counters_never_exceed_total_records_and_completed_chunks_never_exceed_total() {
    let harness = Harness::new();
    let csv = csv_with_rows(250);
    let (response, _) = harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .unwrap();

    harness.drain().await;

    let batch_id = BatchId::new(&response.batch_id).unwrap();
    let state = harness.state(&batch_id).await;
    assert!(state.success_count() + state.failure_count() + state.skipped_count() <= state.total_records());
    assert!(state.completed_chunks() <= state.total_chunks());
    assert_eq!(state.completed_chunks(), state.total_chunks());
}

#[tokio::test]
async fn ended_at_is_set_iff_terminal_and_not_before_started_at() {
    let harness = Harness::new();
    let csv = "ticketnumber,title,customerid\nTKT-001,Login,1001\n";
    let (response, _) = harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .unwrap();

    let batch_id = BatchId::new(&response.batch_id).unwrap();
    let in_flight = harness.state(&batch_id).await;
    assert!(!in_flight.is_terminal());
    assert!(in_flight.ended_at().is_none());

    harness.drain().await;

    let finished = harness.state(&batch_id).await;
    assert!(finished.is_terminal());
    let ended_at = finished.ended_at().expect("terminal batch must have ended_at set");
    assert!(finished.started_at() <= ended_at);
}

#[tokio::test]
async fn a_chunk_that_exhausts_retries_reaches_dlt_without_completing_the_batch() {
    // TicketCreationFailed (P2002, from the FAIL-marker business key) is
    // retryable, so the retry controller redelivers rather than failing
    // the record directly; max_attempts=1 exhausts on the very first
    // abort and routes straight to DLT instead of looping.
    let mut config = PipelineConfig::default();
    config.max_attempts = 1;
    let harness = Harness::with_config(config);

    let csv = "ticketnumber,title,customerid\nTKT-FAIL-1,A,1\nTKT-FAIL-2,B,2\n";
    let (response, _) = harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .unwrap();

    harness.drain().await;

    // The whole chunk aborted before any per-record outcome could be
    // recorded, so `complete_chunk` never ran — the batch stays
    // IN_PROGRESS even though its only chunk has been dead-lettered. A
    // batch only reaches a terminal per-batch status through
    // `complete_chunk`'s derivation (§4.5); DLT delivery on its own does
    // not drive one.
    let batch_id = BatchId::new(&response.batch_id).unwrap();
    let state = harness.state(&batch_id).await;
    assert_eq!(state.status(), BatchStatus::InProgress);
    assert_eq!(harness.durable_log.pending_count("ticket.bulk.requests.DLT"), 1);
}

#[tokio::test]
async fn empty_chunk_completes_without_incrementing_any_counter() {
    use bulk_pipeline::application::services::consumer_pool::ChunkOutcome;
    use bulk_pipeline_domain::{BulkEvent, ChunkIndex};

    let harness = Harness::new();
    let batch_id = BatchId::new("BATCH-9-eeeeeeee").unwrap();
    let event = BulkEvent::new(batch_id.clone(), ChunkIndex(0), 1, vec![], "system", "file.csv", chrono::Utc::now());
    harness.durable_log.publish("ticket.bulk.requests", "key", event).await.unwrap();

    let outcomes = harness.consumer_pool().poll_and_process().await.unwrap();
    assert_eq!(outcomes, vec![ChunkOutcome::AllDone]);

    let state = harness.state(&batch_id).await;
    assert_eq!(state.status(), BatchStatus::Completed);
    assert_eq!(state.success_count(), 0);
    assert_eq!(state.failure_count(), 0);
    assert_eq!(state.skipped_count(), 0);
}

#[tokio::test]
async fn zero_accepted_records_after_parse_is_empty_file() {
    let harness = Harness::new();
    let csv = "ticketnumber,title,customerid\n";
    let err = harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code.tag(), "V1001");
}

#[tokio::test]
async fn exactly_max_records_is_accepted_one_more_is_rejected() {
    let mut config = PipelineConfig::default();
    config.max_records = 5;
    let harness = Harness::with_config(config);

    let csv = csv_with_rows(5);
    harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .expect("exactly MAX_RECORDS must be accepted");

    let mut config = PipelineConfig::default();
    config.max_records = 5;
    let harness = Harness::with_config(config);
    let csv = csv_with_rows(6);
    let err = harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code.tag(), "V1009");
}

#[tokio::test]
async fn cancel_is_idempotent_and_advisory() {
    use bulk_pipeline_domain::TrackingStore;

    let harness = Harness::new();
    let batch_id = BatchId::new("BATCH-7-cccccccc").unwrap();
    harness.tracking_store.initialize(&batch_id, 2, 2, "system", "file.csv").await.unwrap();

    harness.tracking_store.cancel(&batch_id, "operator request").await.unwrap();
    harness.tracking_store.cancel(&batch_id, "operator request").await.unwrap();

    let state = harness.state(&batch_id).await;
    assert_eq!(state.status(), BatchStatus::Cancelled);
}

#[tokio::test]
async fn redelivery_of_the_same_business_key_classifies_as_duplicate_not_a_second_success() {
    use bulk_pipeline::application::services::consumer_pool::ChunkOutcome;
    use bulk_pipeline_domain::{BulkEvent, ChunkIndex, Record};

    let harness = Harness::new();
    let batch_id = BatchId::new("BATCH-8-dddddddd").unwrap();
    let record = Record::new("TKT-REDELIVERED", "Title", 1).unwrap();
    let event = BulkEvent::new(batch_id.clone(), ChunkIndex(0), 1, vec![record.clone()], "system", "file.csv", chrono::Utc::now());

    // Delivered and processed once already (as at-least-once redelivery
    // would replay after a missed ack).
    harness.durable_log.publish("ticket.bulk.requests", "key", event.clone()).await.unwrap();
    let outcomes = harness.consumer_pool().poll_and_process().await.unwrap();
    assert_eq!(outcomes, vec![ChunkOutcome::AllDone]);
    assert_eq!(harness.state(&batch_id).await.success_count(), 1);

    // A second chunk delivering the same business key again (duplicate
    // redelivery at the record-processor boundary) must classify as
    // DUPLICATE_TICKET skipped, never a second success.
    let batch_id_2 = BatchId::new("BATCH-8-ffffffff").unwrap();
    let event_2 = BulkEvent::new(batch_id_2.clone(), ChunkIndex(0), 1, vec![record], "system", "file.csv", chrono::Utc::now());
    harness.durable_log.publish("ticket.bulk.requests", "key2", event_2).await.unwrap();
    harness.consumer_pool().poll_and_process().await.unwrap();

    let state_2 = harness.state(&batch_id_2).await;
    assert_eq!(state_2.success_count(), 0);
    assert_eq!(state_2.skipped_count(), 1);
}
