// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Layer — Bulk Ticket Ingestion Pipeline
//!
//! Pure business logic for the bulk asynchronous ticket-creation pipeline:
//! the record/chunk/event shapes the wire carries, the `BatchState`
//! aggregate that converges per-chunk outcomes into a batch view, and the
//! repository ports (`TrackingStore`, `DurableLog`, `RecordProcessor`) that
//! the application layer drives and the infrastructure layer implements.
//!
//! ## Architecture Position
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │         APPLICATION LAYER                   │
//! │  - Parser, Producer, Consumer Pool           │
//! │  - Retry/DLT Controller, Use Cases           │
//! └─────────────────────────────────────────────┘
//!                      │  depends on
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │           DOMAIN LAYER (this crate)          │
//! │  - Value Objects: Record, Chunk, BulkEvent   │
//! │  - Aggregate: BatchState                     │
//! │  - Ports: TrackingStore, DurableLog, ...     │
//! │  - Error taxonomy: PipelineError/ErrorCode   │
//! └─────────────────────────────────────────────┘
//!                      ▲
//!                      │  implements ports
//! ┌─────────────────────────────────────────────┐
//! │       INFRASTRUCTURE LAYER                  │
//! │  - In-memory / sqlite tracking store         │
//! │  - In-memory durable log                     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! This crate has no I/O of its own — the repository traits are the ports;
//! concrete adapters live in `bulk_pipeline::infrastructure`.

pub mod aggregates;
pub mod config;
pub mod error;
pub mod events;
pub mod repositories;
pub mod value_objects;

pub use aggregates::BatchState;
pub use config::PipelineConfig;
pub use error::{ErrorCode, PipelineError};
pub use events::CacheEvent;
pub use repositories::{Delivery, DurableLog, RecordProcessor, TrackingStore};
pub use value_objects::{
    BatchId, BatchStatus, BulkEvent, Chunk, ChunkIndex, DltRecord, FailureRecord, Priority, Record, Status,
};
