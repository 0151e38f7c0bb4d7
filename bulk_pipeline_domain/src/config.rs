//! # Pipeline Configuration (values)
//!
//! The enumerated configuration surface from §6, as a plain, serializable
//! value object with the spec's defaults baked in via [`Default`]. Layered
//! loading (defaults → file → environment → CLI flags) is an
//! infrastructure concern handled by `bulk_pipeline::infrastructure::config`;
//! this type is what that loader produces and what the rest of the domain
//! and application layers are injected with.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub chunk_size: usize,
    pub max_records: usize,
    pub max_file_size_mib: u64,
    pub concurrency: usize,
    pub max_poll_records: usize,
    pub max_attempts: u32,
    pub initial_interval_ms: u64,
    pub multiplier: f64,
    pub max_interval_ms: u64,
    pub producer_send_timeout_s: u64,
    pub cache_ttl_minutes: u64,
    pub batch_ttl_hours: u64,
    pub dlt_ttl_days: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 100,
            max_records: 10_000,
            max_file_size_mib: 10,
            concurrency: 3,
            max_poll_records: 100,
            max_attempts: 3,
            initial_interval_ms: 1_000,
            multiplier: 2.0,
            max_interval_ms: 10_000,
            producer_send_timeout_s: 30,
            cache_ttl_minutes: 30,
            batch_ttl_hours: 24,
            dlt_ttl_days: 7,
        }
    }
}

impl PipelineConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mib * 1024 * 1024
    }

    /// The bulk-reject threshold from §4.1: "exceeds max(10, 0.5 × rows_seen)".
    pub fn bulk_reject_threshold(&self, rows_seen: usize) -> usize {
        (rows_seen as f64 * 0.5).ceil().max(10.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.chunk_size, 100);
        assert_eq!(cfg.max_records, 10_000);
        assert_eq!(cfg.concurrency, 3);
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.multiplier, 2.0);
    }

    #[test]
    fn bulk_reject_threshold_has_a_floor_of_ten() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.bulk_reject_threshold(3), 10);
        assert_eq!(cfg.bulk_reject_threshold(100), 50);
    }
}
