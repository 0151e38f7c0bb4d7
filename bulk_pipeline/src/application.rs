//! # Application Layer
//!
//! Orchestrates the domain's ports into the ten components of §2: the
//! parser (C1), partitioner/producer (C2), consumer worker pool (C4),
//! retry & dead-letter controller (C6), and the submission
//! orchestrator/query facade use cases (C9/C10) that compose them for
//! external callers.

pub mod dto;
pub mod services;
pub mod use_cases;
