// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling with security-first design: clap does the
//! parsing, this module does the validation, and only a `ValidatedCli` (not
//! the raw `clap` types) crosses into the application layer.
//!
//! ## Commands
//!
//! One subcommand per external interface in the specification's §6:
//!
//! - `submit` — `POST /api/tickets/bulk/upload`
//! - `status` — `GET /api/tickets/bulk/status/{batchId}`
//! - `failures` — `GET /api/tickets/bulk/failures/{batchId}?page=&size=`
//! - `active` — `GET /api/tickets/bulk/active`
//! - `cancel` — `POST /api/tickets/bulk/cancel/{batchId}?reason=`
//! - `dlt` — `GET /api/tickets/bulk/dlt?topic=&limit=`
//!
//! This crate has no dependency on `bulk-pipeline-domain` — by design, the
//! bootstrap layer only knows strings and paths; `bulk-pipeline`'s
//! composition root is what turns a `ValidatedCommand` into a use case
//! call.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

/// Top-level CLI definition, parsed by clap.
#[derive(Debug, Parser)]
#[command(name = "bulk-pipeline", version, about = "Bulk asynchronous ticket-ingestion pipeline")]
pub struct Cli {
    /// Path to a layered config file (TOML/YAML/JSON, auto-detected by extension).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the sqlite tracking store database file.
    #[arg(long, global = true, default_value = "bulk_pipeline.db")]
    pub db: PathBuf,

    /// Bootstrap + application log level.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse and submit a tabular file, draining it to completion in-process
    /// (the durable log and consumer pool are both local to this command).
    Submit {
        /// Path to the .csv/.txt submission.
        file: PathBuf,
        /// Submitter identity; defaults to "system" if omitted.
        #[arg(long)]
        uploaded_by: Option<String>,
    },
    /// Fetch a batch's aggregated status snapshot.
    Status {
        batch_id: String,
    },
    /// Paginated per-batch failure list.
    Failures {
        batch_id: String,
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long, default_value_t = 50)]
        size: usize,
    },
    /// List batches still in the active set.
    Active,
    /// Advisory cancellation of an in-flight batch.
    Cancel {
        batch_id: String,
        #[arg(long, default_value = "operator request")]
        reason: String,
    },
    /// Dead-letter list for a topic.
    Dlt {
        #[arg(long, default_value = "ticket.bulk.requests")]
        topic: String,
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
}

/// Validated CLI configuration. The application layer only ever sees this,
/// never the raw `clap::Cli`.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub config: Option<PathBuf>,
    pub db: PathBuf,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Submit { file: PathBuf, uploaded_by: Option<String> },
    Status { batch_id: String },
    Failures { batch_id: String, page: usize, size: usize },
    Active,
    Cancel { batch_id: String, reason: String },
    Dlt { topic: String, limit: usize },
}

/// Errors raised while validating parsed CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidValue { arg: String, reason: String },
    PathNotFound { path: String },
    PathTraversal { path: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidValue { arg, reason } => write!(f, "invalid value for --{arg}: {reason}"),
            ParseError::PathNotFound { path } => write!(f, "path not found: {path}"),
            ParseError::PathTraversal { path } => write!(f, "path rejected (traversal outside cwd): {path}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Security validation for path and string CLI arguments: rejects `..`
/// traversal segments and, for paths that must already exist, verifies
/// they do.
pub struct SecureArgParser;

impl SecureArgParser {
    /// Validates a free-form string argument against dangerous shell
    /// metacharacters that have no business in a ticket number, reason, or
    /// topic name.
    pub fn validate_argument(value: &str) -> Result<(), ParseError> {
        const DANGEROUS: [char; 6] = [';', '|', '&', '$', '`', '\n'];
        if value.chars().any(|c| DANGEROUS.contains(&c)) {
            return Err(ParseError::InvalidValue {
                arg: "argument".to_string(),
                reason: format!("'{value}' contains a disallowed character"),
            });
        }
        Ok(())
    }

    /// Validates a path that must already exist and reject traversal
    /// outside the current working directory's subtree.
    pub fn validate_path(raw: &str) -> Result<PathBuf, ParseError> {
        Self::reject_traversal(raw)?;
        let path = PathBuf::from(raw);
        if !path.exists() {
            return Err(ParseError::PathNotFound { path: raw.to_string() });
        }
        Ok(path)
    }

    fn reject_traversal(raw: &str) -> Result<(), ParseError> {
        if Path::new(raw).components().any(|c| matches!(c, std::path::Component::ParentDir)) {
            return Err(ParseError::PathTraversal { path: raw.to_string() });
        }
        Ok(())
    }
}

/// Parses CLI arguments with clap (exits the process on `--help`/`--version`
/// or a parse error, per clap's default behavior).
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parses and validates CLI arguments in one step.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    validate_cli(parse_cli())
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    if let Some(ref path) = cli.config {
        SecureArgParser::reject_traversal(&path.to_string_lossy())?;
    }
    SecureArgParser::reject_traversal(&cli.db.to_string_lossy())?;

    let command = match cli.command {
        Commands::Submit { file, uploaded_by } => {
            let validated_file = SecureArgParser::validate_path(&file.to_string_lossy())?;
            if let Some(ref name) = uploaded_by {
                SecureArgParser::validate_argument(name)?;
            }
            ValidatedCommand::Submit {
                file: validated_file,
                uploaded_by,
            }
        }
        Commands::Status { batch_id } => {
            SecureArgParser::validate_argument(&batch_id)?;
            ValidatedCommand::Status { batch_id }
        }
        Commands::Failures { batch_id, page, size } => {
            SecureArgParser::validate_argument(&batch_id)?;
            if size == 0 {
                return Err(ParseError::InvalidValue {
                    arg: "size".to_string(),
                    reason: "must be greater than 0".to_string(),
                });
            }
            ValidatedCommand::Failures { batch_id, page, size }
        }
        Commands::Active => ValidatedCommand::Active,
        Commands::Cancel { batch_id, reason } => {
            SecureArgParser::validate_argument(&batch_id)?;
            SecureArgParser::validate_argument(&reason)?;
            ValidatedCommand::Cancel { batch_id, reason }
        }
        Commands::Dlt { topic, limit } => {
            SecureArgParser::validate_argument(&topic)?;
            if limit == 0 {
                return Err(ParseError::InvalidValue {
                    arg: "limit".to_string(),
                    reason: "must be greater than 0".to_string(),
                });
            }
            ValidatedCommand::Dlt { topic, limit }
        }
    };

    Ok(ValidatedCli {
        command,
        config: cli.config,
        db: cli.db,
        log_level: cli.log_level,
    })
}
