use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{BatchId, ChunkIndex, Record};

/// The envelope published to the durable log (C3) for one chunk (§3).
/// Crosses the transport boundary, so it carries its own globally unique
/// `event_id` independent of the chunk's position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkEvent {
    pub event_id: Uuid,
    pub batch_id: BatchId,
    pub chunk_index: ChunkIndex,
    pub total_chunks: u32,
    pub records: Vec<Record>,
    pub submitted_by: String,
    pub source_filename: String,
    pub timestamp: DateTime<Utc>,
}

impl BulkEvent {
    pub fn new(
        batch_id: BatchId,
        chunk_index: ChunkIndex,
        total_chunks: u32,
        records: Vec<Record>,
        submitted_by: impl Into<String>,
        source_filename: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            batch_id,
            chunk_index,
            total_chunks,
            records,
            submitted_by: submitted_by.into(),
            source_filename: source_filename.into(),
            timestamp,
        }
    }

    /// Message key used for partition assignment — the chunk's address,
    /// not a per-event random value, so redeliveries land on the same
    /// partition (§4.2).
    pub fn message_key(&self) -> String {
        format!("{}-CHUNK-{}", self.batch_id, self.chunk_index.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_key_is_stable_across_clones() {
        let batch_id = BatchId::new("BATCH-1-aaaaaaaa").unwrap();
        let event = BulkEvent::new(batch_id, ChunkIndex(0), 1, vec![], "system", "file.csv", Utc::now());
        let key_a = event.message_key();
        let key_b = event.clone().message_key();
        assert_eq!(key_a, key_b);
    }
}
