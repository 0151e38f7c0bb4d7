// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Cache Event Bus
//!
//! A `tokio::sync::broadcast`-backed publisher for
//! `bulk_pipeline_domain::CacheEvent` (§4.6). Record processing publishes
//! after its unit of work commits; the read-through ticket cache (out of
//! scope here) subscribes to stay coherent.

pub mod event_bus;

pub use event_bus::CacheEventBus;
