// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Bulk Pipeline
//!
//! The bulk asynchronous ticket-ingestion pipeline: tabular parsing and
//! semantic validation of a client submission, deterministic partitioned
//! chunk emission to a durable log, concurrent chunk consumption with
//! per-record error triage and retry/dead-lettering, and a distributed
//! tracking store that aggregates per-chunk outcomes into a batch view.
//!
//! ## Architecture Overview
//!
//! Clean Architecture / DDD layering, same as the rest of this workspace:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Presentation Layer                         │
//! │  (DTOs for the out-of-scope HTTP surface; CLI lives in      │
//! │   bulk-pipeline-bootstrap)                                  │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer                          │
//! │  (Parser, Producer, Consumer Pool, Retry/DLT Controller,     │
//! │   Submission Orchestrator, Query Facade use cases)           │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer                             │
//! │  (bulk-pipeline-domain: Record/Chunk/BulkEvent/BatchState,   │
//! │   TrackingStore/DurableLog/RecordProcessor ports)            │
//! └─────────────────────────────────────────────────────────────┘
//!                                ▲
//!                                │ implements ports
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Infrastructure Layer                          │
//! │  (in-memory + sqlite tracking store, in-memory durable log,  │
//! │   post-commit cache event bus, config, metrics)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Scope
//!
//! Out of scope, named only by their contract: the HTTP surface itself,
//! the individual-ticket CRUD service, its relational persistence, the
//! read-through ticket cache's storage engine, authentication, packaging
//! and deployment. What *is* built: the DTOs those routes would shape
//! their responses from, and the use cases that back them.
//!
//! ## Error Handling
//!
//! A single closed taxonomy shared across every layer —
//! `bulk_pipeline_domain::{ErrorCode, PipelineError}` — rather than
//! per-module error types.
//!
//! ## Testing
//!
//! Unit tests live beside the code they test; end-to-end scenarios and
//! invariant properties live under `tests/`.

pub mod application;
pub mod infrastructure;

// Re-export domain types for convenient access
pub use bulk_pipeline_domain::{
    BatchId, BatchState, BatchStatus, BulkEvent, Chunk, ChunkIndex, DltRecord, ErrorCode, FailureRecord,
    PipelineConfig, PipelineError, Priority, Record, Status,
};
