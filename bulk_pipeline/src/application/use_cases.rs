// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Use Cases
//!
//! The submission orchestrator (C9) and query facade (C10, §4.7): one
//! file per use case, a constructor taking its trait-object dependencies,
//! and an `execute` async method — the same shape the rest of this
//! workspace's use cases follow.
//!
//! - [`SubmitBatchUseCase`] composes the parser (C1) and producer (C2)
//!   for a single submission and returns a `batch_id` promptly.
//! - [`BatchStatusUseCase`], [`ListFailuresUseCase`], [`ListActiveUseCase`],
//!   [`CancelBatchUseCase`], [`DltInspectUseCase`] are the read-only query
//!   facade (C10) over the Tracking Store (C7).

pub mod batch_status;
pub mod cancel_batch;
pub mod dlt_inspect;
pub mod list_active;
pub mod list_failures;
pub mod submit_batch;

pub use batch_status::BatchStatusUseCase;
pub use cancel_batch::CancelBatchUseCase;
pub use dlt_inspect::DltInspectUseCase;
pub use list_active::ListActiveUseCase;
pub use list_failures::ListFailuresUseCase;
pub use submit_batch::SubmitBatchUseCase;
