// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Repository Ports
//!
//! The contracts the application layer drives and the infrastructure
//! layer implements:
//!
//! - [`TrackingStore`] — the process-wide aggregate store (C7).
//! - [`DurableLog`] — the partitioned, replayable event transport (C3),
//!   named only by its contract; concrete adapters provide an in-memory
//!   stand-in for local exercising and testing.
//! - [`RecordProcessor`] — idempotent single-ticket creation (C5), also
//!   named only by its contract.
//!
//! ## Repository Pattern
//!
//! Domain logic stays independent of storage/transport technology;
//! concrete implementations (in-memory, sqlite, ...) live in
//! `bulk_pipeline::infrastructure::adapters` and are wired in at the
//! composition root.

pub mod durable_log;
pub mod record_processor;
pub mod tracking_store;

pub use durable_log::{Delivery, DurableLog};
pub use record_processor::RecordProcessor;
pub use tracking_store::TrackingStore;
