// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Standardized Unix exit codes following BSD `sysexits.h` conventions, plus
//! a mapping from the closed [`bulk_pipeline_domain::ErrorCode`] taxonomy so
//! the CLI's process exit status reflects *why* a command failed instead of
//! collapsing everything to a bare 1.
//!
//! ## Exit Code Conventions
//!
//! - **0**: Success
//! - **1**: General error
//! - **64-78**: Specific error conditions (BSD sysexits.h)
//! - **130/143**: Interrupted / terminated by signal

use std::fmt;

use bulk_pipeline_domain::{ErrorCode, PipelineError};

/// Exit codes following Unix conventions (BSD sysexits.h).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    #[default]
    Success = 0,
    Error = 1,
    UsageError = 64,
    DataError = 65,
    NoInput = 66,
    Unavailable = 69,
    Software = 70,
    IoError = 74,
    TempFail = 75,
    Config = 78,
    Interrupted = 130,
    Terminated = 143,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NoInput => "Cannot open input",
            ExitCode::Unavailable => "Service unavailable",
            ExitCode::Software => "Internal software error",
            ExitCode::IoError => "I/O error",
            ExitCode::TempFail => "Temporary failure, retry",
            ExitCode::Config => "Configuration error",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
            ExitCode::Terminated => "Terminated by signal (SIGTERM)",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

/// Maps a `PipelineError` onto the class of `ErrorCode` it carries (§7):
/// `V1xxx` validation failures are usage/data errors, `P2xxx` processing
/// failures and `I3xxx` infrastructure errors are distinguished by whether
/// they're retryable, `K4xxx` transport errors mean the durable log is
/// unavailable, and `E9xxx` falls back to the general/software buckets.
pub fn map_error_to_exit_code(error: &PipelineError) -> ExitCode {
    match error.code {
        ErrorCode::EmptyFile | ErrorCode::InvalidFileFormat | ErrorCode::MissingRequiredColumns | ErrorCode::BatchSizeExceeded => {
            ExitCode::UsageError
        }
        ErrorCode::InvalidRowData
        | ErrorCode::MissingTicketNumber
        | ErrorCode::InvalidCustomerId
        | ErrorCode::MissingTitle
        | ErrorCode::NullRequest
        | ErrorCode::InvalidStatusTransition
        | ErrorCode::InvalidPriority => ExitCode::DataError,

        ErrorCode::DuplicateTicket => ExitCode::DataError,
        ErrorCode::TicketCreationFailed | ErrorCode::ChunkProcessingFailed | ErrorCode::BatchProcessingFailed | ErrorCode::RecordProcessingFailed => {
            ExitCode::TempFail
        }

        ErrorCode::DatabaseError | ErrorCode::RedisError | ErrorCode::IoError | ErrorCode::TimeoutError => ExitCode::TempFail,
        ErrorCode::MemoryError => ExitCode::Software,

        ErrorCode::KafkaProducerError
        | ErrorCode::KafkaConsumerError
        | ErrorCode::KafkaBrokerUnavailable
        | ErrorCode::KafkaCommitFailed => ExitCode::Unavailable,
        ErrorCode::KafkaSerializationError | ErrorCode::KafkaDeserializationError | ErrorCode::KafkaTopicNotFound => ExitCode::DataError,
        ErrorCode::SentToDlt => ExitCode::Error,

        ErrorCode::UnknownError | ErrorCode::InternalError => ExitCode::Software,
        ErrorCode::ConfigurationError => ExitCode::Config,
        ErrorCode::NotImplemented => ExitCode::UsageError,
    }
}

/// Prints `error` to stderr (when present) and converts the result into a
/// process exit code, for use directly as `main`'s return value.
pub fn result_to_exit_code(result: Result<(), PipelineError>) -> std::process::ExitCode {
    match result {
        Ok(()) => ExitCode::Success.into(),
        Err(error) => {
            eprintln!("error: {error}");
            map_error_to_exit_code(&error).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_match_sysexits() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::UsageError.as_i32(), 64);
        assert_eq!(ExitCode::Config.as_i32(), 78);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn validation_errors_map_to_usage_or_data() {
        assert_eq!(map_error_to_exit_code(&PipelineError::empty_file()), ExitCode::UsageError);
        assert_eq!(map_error_to_exit_code(&PipelineError::missing_ticket_number()), ExitCode::DataError);
    }

    #[test]
    fn transport_errors_map_to_unavailable() {
        assert_eq!(map_error_to_exit_code(&PipelineError::kafka_producer_error("down")), ExitCode::Unavailable);
    }

    #[test]
    fn not_implemented_maps_to_usage_error() {
        assert_eq!(map_error_to_exit_code(&PipelineError::not_implemented("x")), ExitCode::UsageError);
    }

    #[test]
    fn result_to_exit_code_round_trips_success() {
        let code: std::process::ExitCode = result_to_exit_code(Ok(()));
        assert_eq!(format!("{code:?}"), format!("{:?}", std::process::ExitCode::SUCCESS));
    }
}
