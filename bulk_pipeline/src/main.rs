// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bulk Pipeline CLI
//!
//! The composition root: wires the domain's ports to concrete adapters and
//! dispatches to the use case the parsed subcommand names.
//!
//! The durable log (C3) and consumer pool (C4) are named only by their
//! contract in the specification; this binary exercises them with the
//! in-memory `DurableLog` adapter, local to the process. Because of that,
//! `submit` both publishes and immediately drains every chunk through the
//! consumer pool before returning — there is no standing broker for a
//! second process to poll. The Tracking Store (C7), by contrast, is
//! sqlite-backed at a path the caller chooses, so `status`/`failures`/
//! `active`/`cancel`/`dlt` work as independent, later invocations against
//! the same file.

use std::fs::File;
use std::sync::Arc;

use bulk_pipeline::application::services::consumer_pool::ConsumerPool;
use bulk_pipeline::application::use_cases::{
    BatchStatusUseCase, CancelBatchUseCase, DltInspectUseCase, ListActiveUseCase, ListFailuresUseCase, SubmitBatchUseCase,
};
use bulk_pipeline::infrastructure::adapters::fake_record_processor::FakeRecordProcessor;
use bulk_pipeline::infrastructure::adapters::in_memory_log::InMemoryDurableLog;
use bulk_pipeline::infrastructure::repositories::SqliteTrackingStore;
use bulk_pipeline::infrastructure::{config as pipeline_config, metrics::PipelineMetrics};
use bulk_pipeline::{BatchId, ErrorCode, PipelineError};
use bulk_pipeline_bootstrap::cli::ValidatedCommand;
use bulk_pipeline_bootstrap::shutdown::{CancellationToken, ShutdownCoordinator};
use bulk_pipeline_bootstrap::signals::create_signal_handler;
use bulk_pipeline_bootstrap::{bootstrap_cli, result_to_exit_code};
use bulk_pipeline_domain::TrackingStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::time::Duration;

const MAIN_TOPIC: &str = "ticket.bulk.requests";

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let validated_cli = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            return std::process::ExitCode::from(64); // EX_USAGE
        }
    };

    let log_level: tracing::Level = validated_cli
        .log_level
        .parse::<bulk_pipeline_bootstrap::config::LogLevel>()
        .unwrap_or_default()
        .to_tracing_level();
    tracing_subscriber::fmt().with_max_level(log_level).init();

    result_to_exit_code(run(validated_cli).await)
}

async fn run(cli: bulk_pipeline_bootstrap::cli::ValidatedCli) -> Result<(), PipelineError> {
    let config = pipeline_config::load(cli.config.as_ref().and_then(|p| p.to_str()))?;

    let registry = prometheus::Registry::new();
    let _metrics = PipelineMetrics::new(&registry).map_err(|e| PipelineError::internal(e.to_string()))?;

    let pool = SqlitePoolOptions::new()
        .connect_with(
            SqliteConnectOptions::new()
                .filename(&cli.db)
                .create_if_missing(true),
        )
        .await
        .map_err(|e| PipelineError::database_error(e.to_string()))?;
    let tracking_store = Arc::new(SqliteTrackingStore::new(pool));
    tracking_store.run_migrations().await?;

    let shutdown = ShutdownCoordinator::new(Duration::from_secs(5));
    let token = shutdown.token();
    let signal_handler = create_signal_handler();
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        signal_handler
            .wait_for_signal(Box::new(move || {
                shutdown_for_signal.initiate_shutdown();
            }))
            .await;
    });

    match cli.command {
        ValidatedCommand::Submit { file, uploaded_by } => submit(config, tracking_store, &file, uploaded_by.as_deref(), token).await,
        ValidatedCommand::Status { batch_id } => status(tracking_store, &batch_id).await,
        ValidatedCommand::Failures { batch_id, page, size } => failures(tracking_store, &batch_id, page, size).await,
        ValidatedCommand::Active => active(tracking_store).await,
        ValidatedCommand::Cancel { batch_id, reason } => cancel(tracking_store, &batch_id, &reason).await,
        ValidatedCommand::Dlt { topic, limit } => dlt(tracking_store, &topic, limit).await,
    }
}

/// `submit` composes C9 (parse + publish) and then, since the in-memory
/// durable log is local to this process, drives the consumer pool (C4) to
/// drain every chunk before printing the converged `BatchState`.
async fn submit(
    config: bulk_pipeline::PipelineConfig,
    tracking_store: Arc<SqliteTrackingStore>,
    file: &std::path::Path,
    uploaded_by: Option<&str>,
    shutdown: CancellationToken,
) -> Result<(), PipelineError> {
    let durable_log = Arc::new(InMemoryDurableLog::new());
    let filename = file.file_name().and_then(|n| n.to_str()).unwrap_or("submission.csv").to_string();
    let byte_size = file.metadata().map(|m| m.len()).unwrap_or(0);
    let reader = File::open(file).map_err(|e| PipelineError::new(ErrorCode::IoError, e.to_string()))?;

    let submit_use_case = SubmitBatchUseCase::new(config.clone(), durable_log.clone(), MAIN_TOPIC);
    let (accepted, report) = submit_use_case.execute(&filename, byte_size, reader, uploaded_by).await?;

    println!(
        "accepted batch {} — {} records across {} chunk(s), {} row warning(s)",
        accepted.batch_id,
        accepted.total_records,
        accepted.total_chunks,
        report.row_errors.len()
    );

    let record_processor = Arc::new(FakeRecordProcessor::new());
    let consumer_pool = ConsumerPool::new(config, durable_log, tracking_store.clone(), record_processor, MAIN_TOPIC);

    // Drain until a poll comes back empty; the in-memory log has nothing
    // left to redeliver once every chunk reaches a terminal per-chunk
    // outcome or exhausts its retries to the DLT. A signal between polls
    // stops the drain early — whatever chunks already completed stay
    // recorded, the rest remain pending in the (in-process only) log.
    loop {
        if shutdown.is_cancelled() {
            tracing::warn!("shutdown signal received, stopping drain early");
            break;
        }
        let outcomes = consumer_pool.poll_and_process().await?;
        if outcomes.is_empty() {
            break;
        }
    }

    let batch_id = BatchId::new(accepted.batch_id)?;
    if let Some(state) = tracking_store.get(&batch_id).await? {
        print_status(&state);
    }
    Ok(())
}

async fn status(tracking_store: Arc<SqliteTrackingStore>, batch_id: &str) -> Result<(), PipelineError> {
    let batch_id = BatchId::new(batch_id)?;
    let use_case = BatchStatusUseCase::new(tracking_store);
    match use_case.execute(&batch_id).await? {
        Some(response) => {
            println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
            Ok(())
        }
        None => Err(PipelineError::new(ErrorCode::InternalError, format!("no such batch: {batch_id}"))),
    }
}

async fn failures(tracking_store: Arc<SqliteTrackingStore>, batch_id: &str, page: usize, size: usize) -> Result<(), PipelineError> {
    let batch_id = BatchId::new(batch_id)?;
    let use_case = ListFailuresUseCase::new(tracking_store);
    let page = use_case.execute(&batch_id, page, size).await?;
    println!("{}", serde_json::to_string_pretty(&page).unwrap_or_default());
    Ok(())
}

async fn active(tracking_store: Arc<SqliteTrackingStore>) -> Result<(), PipelineError> {
    let use_case = ListActiveUseCase::new(tracking_store);
    let response = use_case.execute().await?;
    for id in response.batch_ids {
        println!("{id}");
    }
    Ok(())
}

async fn cancel(tracking_store: Arc<SqliteTrackingStore>, batch_id: &str, reason: &str) -> Result<(), PipelineError> {
    let batch_id = BatchId::new(batch_id)?;
    let use_case = CancelBatchUseCase::new(tracking_store);
    let response = use_case.execute(&batch_id, reason).await?;
    println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
    Ok(())
}

async fn dlt(tracking_store: Arc<SqliteTrackingStore>, topic: &str, limit: usize) -> Result<(), PipelineError> {
    let use_case = DltInspectUseCase::new(tracking_store);
    let page = use_case.list(topic, limit).await?;
    println!("{}", serde_json::to_string_pretty(&page).unwrap_or_default());
    Ok(())
}

fn print_status(state: &bulk_pipeline::BatchState) {
    println!(
        "batch {}: {:?} ({}/{} chunks, {} ok / {} failed / {} skipped)",
        state.batch_id(),
        state.status(),
        state.completed_chunks(),
        state.total_chunks(),
        state.success_count(),
        state.failure_count(),
        state.skipped_count(),
    );
}
