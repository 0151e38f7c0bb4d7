// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Error Taxonomy
//!
//! A single, closed error type shared across every layer of the pipeline,
//! the same way the rest of the domain favors one flat `PipelineError`
//! enum over per-module error types. [`ErrorCode`] is the classification
//! used for routing (retry vs. terminal, HTTP status mapping, per-record
//! counters); [`PipelineError`] pairs a code with a human-readable message
//! and, where relevant, a source error.
//!
//! New error kinds are added by extending [`ErrorCode`] and the mapping
//! table in [`ErrorCode::retryable`] — this is a closed tagged variant by
//! design, not an open hierarchy of downcastable error types.

use std::fmt;

/// The closed error taxonomy. Prefix encodes the error class; retryability
/// is fixed per variant, never decided at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorCode {
    // V1xxx — validation, always non-retryable.
    EmptyFile,
    InvalidFileFormat,
    MissingRequiredColumns,
    InvalidRowData,
    MissingTicketNumber,
    InvalidCustomerId,
    MissingTitle,
    NullRequest,
    BatchSizeExceeded,

    // P2xxx — processing.
    DuplicateTicket,
    TicketCreationFailed,
    ChunkProcessingFailed,
    BatchProcessingFailed,
    RecordProcessingFailed,
    InvalidStatusTransition,
    InvalidPriority,

    // I3xxx — infrastructure.
    DatabaseError,
    RedisError,
    IoError,
    TimeoutError,
    MemoryError,

    // K4xxx — transport.
    KafkaProducerError,
    KafkaConsumerError,
    KafkaBrokerUnavailable,
    KafkaCommitFailed,
    KafkaSerializationError,
    KafkaDeserializationError,
    KafkaTopicNotFound,
    SentToDlt,

    // E9xxx — general.
    UnknownError,
    InternalError,
    ConfigurationError,
    /// The DLT-reprocess endpoint (§9, Open Question): present in the
    /// query surface but a placeholder until a reprocessing policy is
    /// defined.
    NotImplemented,
}

impl ErrorCode {
    /// Stable machine-readable tag, e.g. `"V1001"`. Numbers are positional
    /// within their class and are stable once assigned — do not renumber.
    pub fn tag(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            EmptyFile => "V1001",
            InvalidFileFormat => "V1002",
            MissingRequiredColumns => "V1003",
            InvalidRowData => "V1004",
            MissingTicketNumber => "V1005",
            InvalidCustomerId => "V1006",
            MissingTitle => "V1007",
            NullRequest => "V1008",
            BatchSizeExceeded => "V1009",

            DuplicateTicket => "P2001",
            TicketCreationFailed => "P2002",
            ChunkProcessingFailed => "P2003",
            BatchProcessingFailed => "P2004",
            RecordProcessingFailed => "P2005",
            InvalidStatusTransition => "P2006",
            InvalidPriority => "P2007",

            DatabaseError => "I3001",
            RedisError => "I3002",
            IoError => "I3003",
            TimeoutError => "I3004",
            MemoryError => "I3005",

            KafkaProducerError => "K4001",
            KafkaConsumerError => "K4002",
            KafkaBrokerUnavailable => "K4003",
            KafkaCommitFailed => "K4004",
            KafkaSerializationError => "K4005",
            KafkaDeserializationError => "K4006",
            KafkaTopicNotFound => "K4007",
            SentToDlt => "K4008",

            UnknownError => "E9001",
            InternalError => "E9002",
            ConfigurationError => "E9003",
            NotImplemented => "E9004",
        }
    }

    /// Whether the delivery substrate should redeliver on this error, per
    /// the not-retryable class set fixed in the retry policy.
    pub fn retryable(&self) -> bool {
        use ErrorCode::*;
        match self {
            // V1xxx: never retryable.
            EmptyFile | InvalidFileFormat | MissingRequiredColumns | InvalidRowData | MissingTicketNumber
            | InvalidCustomerId | MissingTitle | NullRequest | BatchSizeExceeded => false,

            DuplicateTicket => false,
            TicketCreationFailed => true,
            ChunkProcessingFailed => true,
            BatchProcessingFailed => true,
            RecordProcessingFailed => true,
            InvalidStatusTransition => false,
            InvalidPriority => false,

            DatabaseError => true,
            RedisError => true,
            IoError => true,
            TimeoutError => true,
            MemoryError => false,

            KafkaProducerError => true,
            KafkaConsumerError => true,
            KafkaBrokerUnavailable => true,
            KafkaCommitFailed => true,
            KafkaSerializationError => false,
            KafkaDeserializationError => false,
            KafkaTopicNotFound => false,
            SentToDlt => false,

            UnknownError => true,
            InternalError => true,
            ConfigurationError => false,
            NotImplemented => false,
        }
    }

    /// Whether this code belongs to the not-retryable class set that
    /// short-circuits the retry controller straight to DLT (§4.4).
    pub fn is_not_retryable_class(&self) -> bool {
        !self.retryable()
    }

    /// Reverse of [`ErrorCode::tag`], for rehydrating a code from storage
    /// (the sqlite tracking store keeps only the tag, not the variant).
    pub fn from_tag(tag: &str) -> Option<Self> {
        use ErrorCode::*;
        Some(match tag {
            "V1001" => EmptyFile,
            "V1002" => InvalidFileFormat,
            "V1003" => MissingRequiredColumns,
            "V1004" => InvalidRowData,
            "V1005" => MissingTicketNumber,
            "V1006" => InvalidCustomerId,
            "V1007" => MissingTitle,
            "V1008" => NullRequest,
            "V1009" => BatchSizeExceeded,

            "P2001" => DuplicateTicket,
            "P2002" => TicketCreationFailed,
            "P2003" => ChunkProcessingFailed,
            "P2004" => BatchProcessingFailed,
            "P2005" => RecordProcessingFailed,
            "P2006" => InvalidStatusTransition,
            "P2007" => InvalidPriority,

            "I3001" => DatabaseError,
            "I3002" => RedisError,
            "I3003" => IoError,
            "I3004" => TimeoutError,
            "I3005" => MemoryError,

            "K4001" => KafkaProducerError,
            "K4002" => KafkaConsumerError,
            "K4003" => KafkaBrokerUnavailable,
            "K4004" => KafkaCommitFailed,
            "K4005" => KafkaSerializationError,
            "K4006" => KafkaDeserializationError,
            "K4007" => KafkaTopicNotFound,
            "K4008" => SentToDlt,

            "E9001" => UnknownError,
            "E9002" => InternalError,
            "E9003" => ConfigurationError,
            "E9004" => NotImplemented,
            _ => return None,
        })
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// The single error type threaded through every layer of the pipeline.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct PipelineError {
    pub code: ErrorCode,
    pub message: String,
}

impl PipelineError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether the delivery substrate should schedule a redelivery.
    pub fn is_retryable(&self) -> bool {
        self.code.retryable()
    }

    pub fn empty_file() -> Self {
        Self::new(ErrorCode::EmptyFile, "submission contains no data rows")
    }

    pub fn invalid_file_format(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFileFormat, reason)
    }

    pub fn missing_required_columns(columns: &[&str]) -> Self {
        Self::new(
            ErrorCode::MissingRequiredColumns,
            format!("missing required column(s): {}", columns.join(", ")),
        )
    }

    pub fn invalid_row_data(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRowData, reason)
    }

    pub fn missing_ticket_number() -> Self {
        Self::new(ErrorCode::MissingTicketNumber, "ticketnumber is required")
    }

    pub fn invalid_customer_id(raw: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidCustomerId,
            format!("customerid '{}' is not a positive integer", raw.into()),
        )
    }

    pub fn missing_title() -> Self {
        Self::new(ErrorCode::MissingTitle, "title is required")
    }

    pub fn null_request() -> Self {
        Self::new(ErrorCode::NullRequest, "envelope or required field was null/absent")
    }

    pub fn batch_size_exceeded(accepted: usize, max_records: usize) -> Self {
        Self::new(
            ErrorCode::BatchSizeExceeded,
            format!("accepted {accepted} records exceeds MAX_RECORDS ({max_records})"),
        )
    }

    pub fn duplicate_ticket(business_key: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::DuplicateTicket,
            format!("ticket '{}' already exists", business_key.into()),
        )
    }

    pub fn database_error(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, reason)
    }

    pub fn kafka_producer_error(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::KafkaProducerError, reason)
    }

    pub fn configuration_error(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigurationError, reason)
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, reason)
    }

    /// The typed "not implemented" signal for the DLT-reprocess endpoint
    /// placeholder (§9, Open Question).
    pub fn not_implemented(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotImplemented, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_codes_are_never_retryable() {
        assert!(!ErrorCode::EmptyFile.retryable());
        assert!(!ErrorCode::BatchSizeExceeded.retryable());
    }

    #[test]
    fn duplicate_ticket_is_not_retryable() {
        assert!(!ErrorCode::DuplicateTicket.retryable());
    }

    #[test]
    fn transient_infra_errors_are_retryable() {
        assert!(ErrorCode::DatabaseError.retryable());
        assert!(ErrorCode::TimeoutError.retryable());
        assert!(!ErrorCode::MemoryError.retryable());
    }

    #[test]
    fn display_renders_tag() {
        let err = PipelineError::empty_file();
        assert_eq!(err.to_string(), "[V1001] submission contains no data rows");
    }

    #[test]
    fn from_tag_round_trips_every_variant() {
        let codes = [
            ErrorCode::EmptyFile,
            ErrorCode::DuplicateTicket,
            ErrorCode::DatabaseError,
            ErrorCode::KafkaProducerError,
            ErrorCode::InternalError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::from_tag(code.tag()), Some(code));
        }
        assert_eq!(ErrorCode::from_tag("bogus"), None);
    }
}
