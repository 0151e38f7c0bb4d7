use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::value_objects::{BatchId, Record};

/// 0-based position of a `Chunk` within its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkIndex(pub u32);

impl ChunkIndex {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ChunkIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered sub-sequence of at most `CHUNK_SIZE` records belonging to one
/// batch (§3). Immutable once constructed; addressed by `chunk_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    batch_id: BatchId,
    chunk_index: ChunkIndex,
    total_chunks: u32,
    records: Vec<Record>,
}

impl Chunk {
    pub fn new(
        batch_id: BatchId,
        chunk_index: ChunkIndex,
        total_chunks: u32,
        records: Vec<Record>,
    ) -> Result<Self, PipelineError> {
        if chunk_index.get() >= total_chunks && total_chunks > 0 {
            return Err(PipelineError::internal(format!(
                "chunk_index {} out of range for total_chunks {total_chunks}",
                chunk_index.get()
            )));
        }
        Ok(Self {
            batch_id,
            chunk_index,
            total_chunks,
            records,
        })
    }

    /// The stable partition/message key: `batch_id + "-CHUNK-" + chunk_index`.
    pub fn chunk_key(&self) -> String {
        format!("{}-CHUNK-{}", self.batch_id, self.chunk_index.get())
    }

    pub fn batch_id(&self) -> &BatchId {
        &self.batch_id
    }

    pub fn chunk_index(&self) -> ChunkIndex {
        self.chunk_index
    }

    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_id() -> BatchId {
        BatchId::new("BATCH-1700000000000-ab12cd34").unwrap()
    }

    #[test]
    fn chunk_key_matches_spec_format() {
        let chunk = Chunk::new(batch_id(), ChunkIndex(2), 4, vec![]).unwrap();
        assert_eq!(chunk.chunk_key(), "BATCH-1700000000000-ab12cd34-CHUNK-2");
    }

    #[test]
    fn empty_record_list_is_allowed() {
        let chunk = Chunk::new(batch_id(), ChunkIndex(0), 1, vec![]).unwrap();
        assert!(chunk.is_empty());
    }
}
