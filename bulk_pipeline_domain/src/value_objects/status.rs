use std::fmt;

/// Ticket status enum, one of the two row-level defaultable enums (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Open,
    InProgress,
    Pending,
    OnHold,
    Resolved,
    Closed,
    Reopened,
    Cancelled,
}

impl Default for Status {
    fn default() -> Self {
        Status::Open
    }
}

impl Status {
    /// Parses a status value case/whitespace/underscore-insensitively.
    /// Returns `None` (caller defaults and logs a row-level error) rather
    /// than an `Err` — an unrecognized status is not fatal to the row.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase().replace([' ', '_', '-'], "");
        match normalized.as_str() {
            "OPEN" => Some(Status::Open),
            "INPROGRESS" => Some(Status::InProgress),
            "PENDING" => Some(Status::Pending),
            "ONHOLD" => Some(Status::OnHold),
            "RESOLVED" => Some(Status::Resolved),
            "CLOSED" => Some(Status::Closed),
            "REOPENED" => Some(Status::Reopened),
            "CANCELLED" | "CANCELED" => Some(Status::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Open => "OPEN",
            Status::InProgress => "IN_PROGRESS",
            Status::Pending => "PENDING",
            Status::OnHold => "ON_HOLD",
            Status::Resolved => "RESOLVED",
            Status::Closed => "CLOSED",
            Status::Reopened => "REOPENED",
            Status::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// Batch lifecycle status (`BatchState::status`, §3). Terminal statuses
/// are absorbing — see `BatchState::is_terminal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Accepted,
    InProgress,
    Completed,
    PartiallyCompleted,
    Failed,
    Cancelled,
}

impl BatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchStatus::Completed | BatchStatus::PartiallyCompleted | BatchStatus::Failed | BatchStatus::Cancelled
        )
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchStatus::Accepted => "ACCEPTED",
            BatchStatus::InProgress => "IN_PROGRESS",
            BatchStatus::Completed => "COMPLETED",
            BatchStatus::PartiallyCompleted => "PARTIALLY_COMPLETED",
            BatchStatus::Failed => "FAILED",
            BatchStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}
