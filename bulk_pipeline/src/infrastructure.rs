// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Layer
//!
//! Adapters implementing the domain's `TrackingStore`, `DurableLog`, and
//! `RecordProcessor` ports, plus the cross-cutting config/metrics/event-bus
//! plumbing that every layer above depends on through traits only.

pub mod adapters;
pub mod config;
pub mod events;
pub mod metrics;
pub mod repositories;
