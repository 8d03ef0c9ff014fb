//! Vector storage backends
//!
//! # Storage Model
//!
//! Each stored record consists of:
//! - Chunk: the original text and its position
//! - Embedding: the vector representation
//! - Metadata: `{source: document_id}`
//!
//! Records are keyed by chunk id; upserting an existing id replaces it.
//!
//! # Usage
//!
//! ```ignore
//! use ragprimer_lib::store::{PersistentStore, VectorStore};
//!
//! let mut store = PersistentStore::open("./db/chroma_persist", "my_story")?;
//!
//! // Insert chunks with their embeddings
//! store.upsert(&chunks, &embeddings)?;
//!
//! // Search by vector similarity
//! let results = store.query(&query_embedding, 2)?;
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;
use crate::embed::Embedding;
use crate::{Error, Result};

/// A search result with similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The matched chunk
    pub chunk: Chunk,
    /// Cosine similarity, -1.0 to 1.0 (higher is more similar)
    pub score: f32,
}

impl SearchResult {
    /// Cosine distance, 0.0 for identical direction (lower is more similar).
    #[must_use]
    pub fn distance(&self) -> f32 {
        1.0 - self.score
    }
}

/// One stored item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub chunk: Chunk,
    pub embedding: Embedding,
    pub metadata: HashMap<String, String>,
}

/// Trait for vector storage backends
pub trait VectorStore: Send + Sync {
    /// Insert or replace chunks with their embeddings, keyed by chunk id
    ///
    /// # Arguments
    /// * `chunks` - The text chunks to store
    /// * `embeddings` - Corresponding embeddings (must be same length)
    fn upsert(&mut self, chunks: &[Chunk], embeddings: &[Embedding]) -> Result<()>;

    /// Search for similar chunks
    ///
    /// # Arguments
    /// * `query_embedding` - The query vector
    /// * `k` - Number of results to return
    ///
    /// # Returns
    /// Top-k results sorted by similarity (highest first)
    fn query(&self, query_embedding: &Embedding, k: usize) -> Result<Vec<SearchResult>>;

    /// Look up a stored chunk by id
    fn get(&self, id: &str) -> Option<Chunk>;

    /// Get total number of stored chunks
    fn len(&self) -> usize;

    /// Check if store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all stored data
    fn clear(&mut self) -> Result<()>;
}

/// Pair chunks with embeddings, rejecting mismatched inputs before anything is stored.
pub(crate) fn build_records(chunks: &[Chunk], embeddings: &[Embedding]) -> Result<Vec<Record>> {
    if chunks.len() != embeddings.len() {
        return Err(Error::InvalidArgument(format!(
            "got {} chunks but {} embeddings",
            chunks.len(),
            embeddings.len()
        )));
    }
    Ok(chunks
        .iter()
        .zip(embeddings)
        .map(|(chunk, embedding)| Record {
            metadata: chunk.metadata(),
            chunk: chunk.clone(),
            embedding: embedding.clone(),
        })
        .collect())
}

/// Brute-force top-k over a set of records.
pub(crate) fn rank<'a>(
    records: impl Iterator<Item = &'a Record>,
    query: &[f32],
    k: usize,
) -> Result<Vec<SearchResult>> {
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();
    for record in records {
        if record.embedding.len() != query.len() {
            return Err(Error::Store(format!(
                "chunk {} has dimension {}, query has {}",
                record.chunk.id,
                record.embedding.len(),
                query.len()
            )));
        }
        results.push(SearchResult {
            chunk: record.chunk.clone(),
            score: cosine_similarity(query, &record.embedding),
        });
    }

    // ties broken by id so results are stable across HashMap orderings
    results.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.chunk.id.cmp(&b.chunk.id),
        ord => ord,
    });
    results.truncate(k);
    Ok(results)
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 means identical direction.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

mod memory;
mod persistent;

pub use memory::*;
pub use persistent::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_distance() {
        let result = SearchResult {
            chunk: Chunk {
                id: "a_chunk1".to_string(),
                text: String::new(),
                sequence_index: 1,
                source_document_id: "a".to_string(),
            },
            score: 0.25,
        };
        assert!((result.distance() - 0.75).abs() < 1e-6);
    }
}
