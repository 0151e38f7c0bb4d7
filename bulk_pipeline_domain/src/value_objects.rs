// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Value Objects
//!
//! Immutable types with validation baked into construction. Each one
//! mirrors the shapes in the wire/data model: a `Record` parsed from a
//! submission row, a `Chunk` of records assigned to a partition, the
//! `BulkEvent` envelope that crosses the durable log, and the
//! `FailureRecord`/`DltRecord` append-only entries the tracking store
//! collects.

pub mod batch_id;
pub mod bulk_event;
pub mod chunk;
pub mod dlt_record;
pub mod failure_record;
pub mod priority;
pub mod record;
pub mod status;

pub use batch_id::BatchId;
pub use bulk_event::BulkEvent;
pub use chunk::{Chunk, ChunkIndex};
pub use dlt_record::DltRecord;
pub use failure_record::FailureRecord;
pub use priority::Priority;
pub use record::Record;
pub use status::{BatchStatus, Status};
