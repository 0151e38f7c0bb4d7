use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// An entry appended to a batch's per-batch failure list (§3, §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    pub business_key: String,
    pub error_code: ErrorCode,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl FailureRecord {
    pub fn new(business_key: impl Into<String>, error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            business_key: business_key.into(),
            error_code,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
