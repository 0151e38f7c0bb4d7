use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A batch identifier, minted by the Partitioner/Producer (§4.2) as
/// `"BATCH-" + millis + "-" + 8-char random`. This type only validates the
/// shape; minting a fresh id requires a clock and randomness, which are
/// infrastructure concerns owned by `bulk_pipeline::application::services::producer`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    const PREFIX: &'static str = "BATCH-";

    /// Wraps an already-minted identifier, checking only the `BATCH-`
    /// prefix and non-emptiness of the suffix — callers that mint ids
    /// themselves are trusted to follow the `millis-random` shape.
    pub fn new(raw: impl Into<String>) -> Result<Self, PipelineError> {
        let raw = raw.into();
        if !raw.starts_with(Self::PREFIX) || raw.len() == Self::PREFIX.len() {
            return Err(PipelineError::invalid_row_data(format!(
                "'{raw}' is not a well-formed batch id"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BatchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_id() {
        assert!(BatchId::new("BATCH-1700000000000-ab12cd34").is_ok());
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(BatchId::new("1700000000000-ab12cd34").is_err());
    }
}
