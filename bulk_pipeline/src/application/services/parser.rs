// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Parser (C1)
//!
//! Decodes a tabular submission, applies per-row semantic validation, and
//! produces a validated `Record` sequence plus a `ValidationReport` (§4.1).

use std::io::Read;

use bulk_pipeline_domain::{PipelineConfig, PipelineError, Priority, Record, Status};

use crate::application::dto::{RowError, ValidationReport};

const REQUIRED_COLUMNS: [&str; 3] = ["ticketnumber", "title", "customerid"];
const ALLOWED_EXTENSIONS: [&str; 2] = ["csv", "txt"];

pub struct Parser {
    config: PipelineConfig,
}

impl Parser {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Normalizes a header name the way §4.1 requires: lower-cased, with
    /// spaces and underscores stripped.
    fn normalize_header(raw: &str) -> String {
        raw.trim().to_ascii_lowercase().replace([' ', '_'], "")
    }

    fn check_extension(&self, filename: &str) -> Result<(), PipelineError> {
        let ext = filename.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
        if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(())
        } else {
            Err(PipelineError::invalid_file_format(format!(
                "'{filename}' does not have an accepted extension ({})",
                ALLOWED_EXTENSIONS.join(", ")
            )))
        }
    }

    /// Parses `reader` as the submission named `filename` of `byte_size`
    /// bytes. Returns the accepted records plus a report of every row
    /// error, or a bulk-level `PipelineError` for failures that reject the
    /// whole submission.
    pub fn parse<R: Read>(
        &self,
        filename: &str,
        byte_size: u64,
        reader: R,
    ) -> Result<(Vec<Record>, ValidationReport), PipelineError> {
        if byte_size == 0 {
            return Err(PipelineError::empty_file());
        }
        if byte_size > self.config.max_file_size_bytes() {
            return Err(PipelineError::invalid_file_format(format!(
                "submission of {byte_size} bytes exceeds MAX_FILE_SIZE_MIB ({} MiB)",
                self.config.max_file_size_mib
            )));
        }
        self.check_extension(filename)?;

        let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| PipelineError::invalid_file_format(format!("failed to read header row: {e}")))?
            .clone();
        let normalized: Vec<String> = headers.iter().map(Self::normalize_header).collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !normalized.iter().any(|h| h == *col))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::missing_required_columns(&missing));
        }

        let col_index = |name: &str| normalized.iter().position(|h| h == name);
        let idx_ticket = col_index("ticketnumber").expect("validated present above");
        let idx_title = col_index("title").expect("validated present above");
        let idx_customer = col_index("customerid").expect("validated present above");
        let idx_description = col_index("description");
        let idx_status = col_index("status");
        let idx_priority = col_index("priority");
        let idx_assignee = col_index("assignedto");

        let mut accepted = Vec::new();
        let mut report = ValidationReport::new(0);
        let mut seen_keys = std::collections::HashSet::new();

        for (row_idx, result) in csv_reader.records().enumerate() {
            report.rows_seen += 1;
            let row_number = row_idx + 2; // 1-based, header is row 1

            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    report.row_errors.push(RowError {
                        row_number,
                        column: None,
                        code: bulk_pipeline_domain::ErrorCode::InvalidRowData,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            match Self::parse_row(
                &row,
                row_number,
                idx_ticket,
                idx_title,
                idx_customer,
                idx_description,
                idx_status,
                idx_priority,
                idx_assignee,
                &mut report,
            ) {
                Some(record) => {
                    if !seen_keys.insert(record.business_key().to_string()) {
                        report.row_errors.push(RowError {
                            row_number,
                            column: Some("ticketnumber".into()),
                            code: bulk_pipeline_domain::ErrorCode::DuplicateTicket,
                            message: format!("duplicate ticketnumber '{}' within submission", record.business_key()),
                        });
                        continue;
                    }
                    accepted.push(record);
                }
                None => {}
            }
        }

        let threshold = self.config.bulk_reject_threshold(report.rows_seen);
        if report.row_errors.len() > threshold {
            return Err(PipelineError::invalid_file_format(format!(
                "{} row errors exceeds threshold {threshold}",
                report.row_errors.len()
            )));
        }

        if accepted.len() > self.config.max_records {
            return Err(PipelineError::batch_size_exceeded(accepted.len(), self.config.max_records));
        }

        report.accepted = accepted.len();
        Ok((accepted, report))
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_row(
        row: &csv::StringRecord,
        row_number: usize,
        idx_ticket: usize,
        idx_title: usize,
        idx_customer: usize,
        idx_description: Option<usize>,
        idx_status: Option<usize>,
        idx_priority: Option<usize>,
        idx_assignee: Option<usize>,
        report: &mut ValidationReport,
    ) -> Option<Record> {
        let ticket = row.get(idx_ticket).unwrap_or("").trim();
        if ticket.is_empty() {
            report.row_errors.push(RowError {
                row_number,
                column: Some("ticketnumber".into()),
                code: bulk_pipeline_domain::ErrorCode::MissingTicketNumber,
                message: "ticketnumber is required".into(),
            });
            return None;
        }

        let title = row.get(idx_title).unwrap_or("").trim();
        if title.is_empty() {
            report.row_errors.push(RowError {
                row_number,
                column: Some("title".into()),
                code: bulk_pipeline_domain::ErrorCode::MissingTitle,
                message: "title is required".into(),
            });
            return None;
        }

        let customer_raw = row.get(idx_customer).unwrap_or("").trim();
        let customer_id: i64 = match customer_raw.parse() {
            Ok(id) if id > 0 => id,
            _ => {
                report.row_errors.push(RowError {
                    row_number,
                    column: Some("customerid".into()),
                    code: bulk_pipeline_domain::ErrorCode::InvalidCustomerId,
                    message: format!("'{customer_raw}' is not a positive integer"),
                });
                return None;
            }
        };

        let mut record = match Record::new(ticket, title, customer_id) {
            Ok(record) => record,
            Err(err) => {
                report.row_errors.push(RowError {
                    row_number,
                    column: None,
                    code: err.code,
                    message: err.message,
                });
                return None;
            }
        };

        if let Some(idx) = idx_description {
            if let Some(description) = row.get(idx) {
                if !description.is_empty() {
                    record = record.with_description(description);
                }
            }
        }

        if let Some(idx) = idx_status {
            if let Some(raw) = row.get(idx).filter(|s| !s.is_empty()) {
                match Status::parse_lenient(raw) {
                    Some(status) => record = record.with_status(status),
                    None => {
                        report.row_errors.push(RowError {
                            row_number,
                            column: Some("status".into()),
                            code: bulk_pipeline_domain::ErrorCode::InvalidRowData,
                            message: format!("'{raw}' is not a recognized status; defaulted to OPEN"),
                        });
                    }
                }
            }
        }

        if let Some(idx) = idx_priority {
            if let Some(raw) = row.get(idx).filter(|s| !s.is_empty()) {
                match Priority::parse_lenient(raw) {
                    Some(priority) => record = record.with_priority(priority),
                    None => {
                        report.row_errors.push(RowError {
                            row_number,
                            column: Some("priority".into()),
                            code: bulk_pipeline_domain::ErrorCode::InvalidPriority,
                            message: format!("'{raw}' is not a recognized priority; defaulted to MEDIUM"),
                        });
                    }
                }
            }
        }

        if let Some(idx) = idx_assignee {
            let assignee = row.get(idx).and_then(|raw| raw.trim().parse::<i64>().ok());
            record = record.with_assignee_id(assignee);
        }

        Some(record)
    }
}
