//! # Aggregates
//!
//! `BatchState` is the only aggregate root in this domain — the process-
//! wide, externally-visible view of a batch's progress that the Tracking
//! Store (C7) converges per-chunk outcomes into (§3, §4.5).

pub mod batch_state;

pub use batch_state::BatchState;
