// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Metrics
//!
//! Prometheus counters and histograms for the components named in §5's
//! operational concerns: chunks/records processed, retries issued,
//! dead-letters produced, and end-to-end batch latency.

use prometheus::{HistogramVec, IntCounterVec, Registry};

pub struct PipelineMetrics {
    pub chunks_processed_total: IntCounterVec,
    pub records_processed_total: IntCounterVec,
    pub retries_total: IntCounterVec,
    pub dlt_messages_total: IntCounterVec,
    pub batch_duration_seconds: HistogramVec,
}

impl PipelineMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let chunks_processed_total = IntCounterVec::new(
            prometheus::Opts::new("bulk_pipeline_chunks_processed_total", "chunks the consumer pool has finished"),
            &["outcome"],
        )?;
        let records_processed_total = IntCounterVec::new(
            prometheus::Opts::new("bulk_pipeline_records_processed_total", "records classified by the consumer pool"),
            &["outcome"],
        )?;
        let retries_total = IntCounterVec::new(
            prometheus::Opts::new("bulk_pipeline_retries_total", "redeliveries scheduled by the retry controller"),
            &["error_code"],
        )?;
        let dlt_messages_total = IntCounterVec::new(
            prometheus::Opts::new("bulk_pipeline_dlt_messages_total", "messages appended to a dead-letter topic"),
            &["topic"],
        )?;
        let batch_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "bulk_pipeline_batch_duration_seconds",
                "wall-clock time from batch acceptance to terminal status",
            ),
            &["final_status"],
        )?;

        registry.register(Box::new(chunks_processed_total.clone()))?;
        registry.register(Box::new(records_processed_total.clone()))?;
        registry.register(Box::new(retries_total.clone()))?;
        registry.register(Box::new(dlt_messages_total.clone()))?;
        registry.register(Box::new(batch_duration_seconds.clone()))?;

        Ok(Self {
            chunks_processed_total,
            records_processed_total,
            retries_total,
            dlt_messages_total,
            batch_duration_seconds,
        })
    }
}
