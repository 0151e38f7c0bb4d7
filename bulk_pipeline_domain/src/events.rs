//! # Post-commit Cache Events (C8)
//!
//! The event kinds C5 (the record processor) publishes to keep the
//! single-ticket read cache coherent with the database (§4.6). Distinct
//! from [`crate::value_objects::BulkEvent`] — the bulk wire envelope — to
//! avoid name collision between the two very different "event" concepts
//! this domain has.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Published only after the enclosing unit of work commits (§4.6, §9).
/// Subscribers must not raise — cache-consistency failures are non-fatal
/// to the business write that triggered them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CacheEvent {
    Created { id: String, snapshot: Value },
    Updated { id: String, snapshot: Value },
    Deleted { id: String, business_key: String },
    CacheHydrate { id: String, snapshot: Value },
    Rolledback { meta: Value },
}

impl CacheEvent {
    pub fn id(&self) -> Option<&str> {
        match self {
            CacheEvent::Created { id, .. }
            | CacheEvent::Updated { id, .. }
            | CacheEvent::Deleted { id, .. }
            | CacheEvent::CacheHydrate { id, .. } => Some(id),
            CacheEvent::Rolledback { .. } => None,
        }
    }
}

/// Metadata stamped on every dispatched event for ordering/debugging —
/// events from one unit of work publish in order; concurrent commits may
/// interleave (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEventEnvelope {
    pub event: CacheEvent,
    pub published_at: DateTime<Utc>,
}

impl CacheEventEnvelope {
    pub fn new(event: CacheEvent) -> Self {
        Self {
            event,
            published_at: Utc::now(),
        }
    }
}
