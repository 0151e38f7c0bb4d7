use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An entry appended to a per-topic dead-letter list when the retry
/// controller exhausts its attempt budget (§3, §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DltRecord {
    pub origin_topic: String,
    pub message_key: String,
    pub payload_snapshot: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub error_message: String,
    pub error_class_tag: String,
    pub reprocessed: bool,
    pub reprocessed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl DltRecord {
    pub fn new(
        origin_topic: impl Into<String>,
        message_key: impl Into<String>,
        payload_snapshot: serde_json::Value,
        error_message: impl Into<String>,
        error_class_tag: impl Into<String>,
    ) -> Self {
        Self {
            origin_topic: origin_topic.into(),
            message_key: message_key.into(),
            payload_snapshot,
            timestamp: Utc::now(),
            error_message: error_message.into(),
            error_class_tag: error_class_tag.into(),
            reprocessed: false,
            reprocessed_at: None,
            notes: None,
        }
    }
}
