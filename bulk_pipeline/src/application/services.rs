//! # Application Services
//!
//! One file per pipeline component (§4): the parser (C1), the
//! partitioner/producer (C2), the consumer worker pool (C4), and the
//! retry & dead-letter controller (C6).

pub mod consumer_pool;
pub mod parser;
pub mod producer;
pub mod retry_controller;
