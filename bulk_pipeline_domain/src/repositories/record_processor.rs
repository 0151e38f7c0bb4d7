use async_trait::async_trait;

use crate::error::PipelineError;
use crate::value_objects::Record;

/// The record processor contract (C5): idempotent creation of a single
/// ticket by business key, named only by its contract per §1 (the
/// individual-ticket CRUD service and its relational persistence are
/// explicitly out of scope here). `process` must be safe to invoke more
/// than once for the same `business_key` — at-least-once delivery from
/// C3/C4 relies on that idempotence to keep observable effects
/// at-most-once (§8, "Round-trips and idempotence").
#[async_trait]
pub trait RecordProcessor: Send + Sync {
    /// Returns `Ok(())` on successful (including idempotent-repeat)
    /// creation. Returns `Err` classified per §7's exception-to-code
    /// mapping; the consumer pool (C4) uses the returned `ErrorCode` to
    /// decide between per-record failure recording and chunk abort.
    async fn process(&self, record: &Record) -> Result<(), PipelineError>;
}
