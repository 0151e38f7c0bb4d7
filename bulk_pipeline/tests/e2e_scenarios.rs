// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end scenarios: submit through the orchestrator, drain through
//! the consumer pool, and assert on the converged `BatchState`.

mod common;

use bulk_pipeline::BatchStatus;
use common::{csv_with_rows, Harness};

#[tokio::test]
async fn three_row_happy_path_completes() {
    let harness = Harness::new();
    let csv = "ticketnumber,title,customerid\nTKT-001,Login,1001\nTKT-002,Reset,1002\nTKT-003,Dash,1003\n";

    let (response, report) = harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .unwrap();
    assert_eq!(response.total_records, 3);
    assert_eq!(response.total_chunks, 1);
    assert!(report.row_errors.is_empty());

    harness.drain().await;

    let batch_id = bulk_pipeline::BatchId::new(&response.batch_id).unwrap();
    let state = harness.state(&batch_id).await;
    assert_eq!(state.status(), BatchStatus::Completed);
    assert_eq!(state.success_count(), 3);
}

#[tokio::test]
async fn one_invalid_customer_id_under_threshold_drops_the_row_not_the_batch() {
    let harness = Harness::new();
    let csv = "ticketnumber,title,customerid\nTKT-001,Login,1001\nTKT-002,Reset,abc\nTKT-003,Dash,1003\n";

    let (response, report) = harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .unwrap();
    assert_eq!(response.total_records, 2, "row 2's bad customerid is dropped, not bulk-rejected");
    assert_eq!(report.row_errors.len(), 1);
    assert_eq!(report.row_errors[0].code.tag(), "V1006");

    harness.drain().await;

    let batch_id = bulk_pipeline::BatchId::new(&response.batch_id).unwrap();
    let state = harness.state(&batch_id).await;
    assert_eq!(state.status(), BatchStatus::Completed);
    assert_eq!(state.success_count(), 2);
}

#[tokio::test]
async fn three_hundred_fifty_rows_split_into_four_chunks() {
    let harness = Harness::new();
    let csv = csv_with_rows(350);

    let (response, _report) = harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .unwrap();
    assert_eq!(response.total_records, 350);
    assert_eq!(response.total_chunks, 4, "100,100,100,50 at the default chunk size of 100");

    harness.drain().await;

    let batch_id = bulk_pipeline::BatchId::new(&response.batch_id).unwrap();
    let state = harness.state(&batch_id).await;
    assert_eq!(state.status(), BatchStatus::Completed);
    assert_eq!(state.success_count(), 350);
}

#[tokio::test]
async fn a_pre_existing_ticket_downstream_is_skipped_not_failed() {
    let harness = Harness::new();
    let csv = csv_with_rows(200);

    // Seeds the downstream service's uniqueness constraint the way a
    // ticket already present in the database would: a prior successful
    // `process()` call for the same business key.
    let seeded = bulk_pipeline::Record::new("TKT-050", "Issue 50", 1050).unwrap();
    harness.record_processor.process(&seeded).await.unwrap();

    let (response, _report) = harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .unwrap();
    assert_eq!(response.total_records, 200);

    harness.drain().await;

    let batch_id = bulk_pipeline::BatchId::new(&response.batch_id).unwrap();
    let state = harness.state(&batch_id).await;
    assert_eq!(state.status(), BatchStatus::PartiallyCompleted);
    assert_eq!(state.success_count(), 199);
    assert_eq!(state.skipped_count(), 1);
}

#[tokio::test]
async fn producer_backed_by_an_unreachable_log_fails_kafka_producer_error() {
    let harness = Harness::new().with_unreachable_log();
    let csv = "ticketnumber,title,customerid\nTKT-001,Login,1001\n";

    let err = harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code.tag(), "K4001");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn transient_failures_retry_then_dead_letter_on_exhaustion() {
    use bulk_pipeline::application::services::consumer_pool::ChunkOutcome;

    // Zero backoff so each redelivery is immediately pollable again,
    // without a test needing to wait out the real exponential delay the
    // retry controller schedules against wall-clock `Instant`s.
    let mut config = bulk_pipeline::PipelineConfig::default();
    config.max_attempts = 3;
    config.initial_interval_ms = 0;
    config.max_interval_ms = 0;
    let harness = common::Harness::with_config(config);

    // `FAIL` in the business key drives the fake record processor's
    // simulated downstream failure (TicketCreationFailed, retryable)
    // every single delivery, so the chunk aborts on every attempt.
    let csv = "ticketnumber,title,customerid\nTKT-FAIL-1,Stuck,1001\n";
    harness
        .submit_use_case()
        .execute("submission.csv", csv.len() as u64, csv.as_bytes(), None)
        .await
        .unwrap();

    let pool = harness.consumer_pool();
    for attempt in 1..=3 {
        let outcomes = pool.poll_and_process().await.unwrap();
        assert_eq!(outcomes, vec![ChunkOutcome::Aborted], "attempt {attempt} should abort and be redelivered");
    }

    assert_eq!(harness.durable_log.pending_count("ticket.bulk.requests.DLT"), 1);
    let dlt = harness.tracking_store.list_dlt("ticket.bulk.requests", 10).await.unwrap();
    assert_eq!(dlt.len(), 1);
    assert_eq!(dlt[0].error_class_tag, "P2002");
}
