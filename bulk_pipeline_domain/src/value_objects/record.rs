use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::value_objects::{Priority, Status};

const MAX_BUSINESS_KEY_BYTES: usize = 50;
const MAX_TITLE_BYTES: usize = 255;
const MAX_DESCRIPTION_BYTES: usize = 5000;

/// A validated work item parsed from a submission row (§3). Immutable once
/// constructed — defaulting of `status`/`priority` and truncation of
/// `description` happen during construction, not downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    business_key: String,
    title: String,
    customer_id: i64,
    description: Option<String>,
    status: Status,
    priority: Priority,
    assignee_id: Option<i64>,
}

impl Record {
    /// Validates the required fields. `description` is truncated (never
    /// rejected) to `MAX_DESCRIPTION_BYTES`; unrecognized `status`/
    /// `priority` are the caller's responsibility to default before
    /// calling this — see `bulk_pipeline::application::services::parser`.
    pub fn new(
        business_key: impl Into<String>,
        title: impl Into<String>,
        customer_id: i64,
    ) -> Result<Self, PipelineError> {
        let business_key = business_key.into();
        let title = title.into();

        if business_key.trim().is_empty() {
            return Err(PipelineError::missing_ticket_number());
        }
        if business_key.len() > MAX_BUSINESS_KEY_BYTES {
            return Err(PipelineError::invalid_row_data(format!(
                "business_key exceeds {MAX_BUSINESS_KEY_BYTES} bytes"
            )));
        }
        if title.trim().is_empty() {
            return Err(PipelineError::missing_title());
        }
        if title.len() > MAX_TITLE_BYTES {
            return Err(PipelineError::invalid_row_data(format!(
                "title exceeds {MAX_TITLE_BYTES} bytes"
            )));
        }
        if customer_id <= 0 {
            return Err(PipelineError::invalid_customer_id(customer_id.to_string()));
        }

        Ok(Self {
            business_key,
            title,
            customer_id,
            description: None,
            status: Status::default(),
            priority: Priority::default(),
            assignee_id: None,
        })
    }

    /// Returns a new `Record` with `description` set, truncated silently
    /// to `MAX_DESCRIPTION_BYTES` rather than rejected (§4.1).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let mut description = description.into();
        if description.len() > MAX_DESCRIPTION_BYTES {
            let mut end = MAX_DESCRIPTION_BYTES;
            while !description.is_char_boundary(end) {
                end -= 1;
            }
            description.truncate(end);
        }
        self.description = Some(description);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Non-positive assignee ids are dropped silently (§4.1, "else dropped").
    pub fn with_assignee_id(mut self, assignee_id: Option<i64>) -> Self {
        self.assignee_id = assignee_id.filter(|id| *id > 0);
        self
    }

    pub fn business_key(&self) -> &str {
        &self.business_key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn customer_id(&self) -> i64 {
        self.customer_id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn assignee_id(&self) -> Option<i64> {
        self.assignee_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_business_key() {
        let err = Record::new("  ", "Title", 1).unwrap_err();
        assert_eq!(err.code.tag(), "V1005");
    }

    #[test]
    fn rejects_non_positive_customer_id() {
        let err = Record::new("TKT-1", "Title", 0).unwrap_err();
        assert_eq!(err.code.tag(), "V1006");
    }

    #[test]
    fn description_is_truncated_not_rejected() {
        let long = "x".repeat(MAX_DESCRIPTION_BYTES + 100);
        let record = Record::new("TKT-1", "Title", 1).unwrap().with_description(long);
        assert_eq!(record.description().unwrap().len(), MAX_DESCRIPTION_BYTES);
    }

    #[test]
    fn non_positive_assignee_is_dropped() {
        let record = Record::new("TKT-1", "Title", 1).unwrap().with_assignee_id(Some(-5));
        assert_eq!(record.assignee_id(), None);
    }

    #[test]
    fn defaults_status_and_priority() {
        let record = Record::new("TKT-1", "Title", 1).unwrap();
        assert_eq!(record.status(), Status::Open);
        assert_eq!(record.priority(), Priority::Medium);
    }
}
