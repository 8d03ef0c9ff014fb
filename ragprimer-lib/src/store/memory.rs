use std::collections::HashMap;

use crate::chunk::Chunk;
use crate::embed::Embedding;
use crate::store::{build_records, rank, Record, SearchResult, VectorStore};
use crate::Result;

/// In-memory vector store for development and testing.
///
/// Uses brute-force cosine similarity search. Suitable for small datasets
/// (< 10k chunks). For production, use a proper vector database.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, Record>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_records(records: Vec<Record>) -> Self {
        let mut store = Self::new();
        store.extend(records);
        store
    }

    /// Stored records ordered by id.
    pub(crate) fn records(&self) -> Vec<&Record> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| a.chunk.id.cmp(&b.chunk.id));
        records
    }

    fn extend(&mut self, records: Vec<Record>) {
        for record in records {
            self.records.insert(record.chunk.id.clone(), record);
        }
    }
}

impl VectorStore for MemoryStore {
    fn upsert(&mut self, chunks: &[Chunk], embeddings: &[Embedding]) -> Result<()> {
        let records = build_records(chunks, embeddings)?;
        self.extend(records);
        Ok(())
    }

    fn query(&self, query: &Embedding, k: usize) -> Result<Vec<SearchResult>> {
        rank(self.records.values(), query, k)
    }

    fn get(&self, id: &str) -> Option<Chunk> {
        self.records.get(id).map(|r| r.chunk.clone())
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn clear(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }
}
