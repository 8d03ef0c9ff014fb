//! Document chunking strategies
//!
//! Every strategy turns one [`Document`] into an ordered list of [`Chunk`]s
//! whose ids are derived from the document id and the 1-based position:
//! `"{document_id}_chunk{sequence_index}"`.
//!
//! - [`FixedSizeChunker`]: fixed character windows with overlap, splits mid-word
//! - [`RecursiveChunker`]: breaks on separators (paragraphs, then lines) first
//!
//! # Implementing a Chunker
//!
//! ```ignore
//! use ragprimer_lib::chunk::{number_pieces, Chunk, Chunker, Document};
//!
//! struct LineChunker;
//!
//! impl Chunker for LineChunker {
//!     fn chunk(&self, document: &Document) -> ragprimer_lib::Result<Vec<Chunk>> {
//!         Ok(number_pieces(document, document.text.lines()))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "line"
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A source document, typically one file read from disk
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Document {
    /// Caller supplied unique identifier (e.g. the file name)
    pub id: String,
    /// Full text of the document, possibly empty
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A chunk of text with its position in the source document
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Chunk {
    /// Unique identifier, `"{source_document_id}_chunk{sequence_index}"`
    pub id: String,
    /// The text content of this chunk
    pub text: String,
    /// 1-based position within the source document
    pub sequence_index: usize,
    /// Id of the document this chunk was cut from
    pub source_document_id: String,
}

impl Chunk {
    /// Metadata attached to the chunk when it is stored: `{source: document_id}`.
    #[must_use]
    pub fn metadata(&self) -> HashMap<String, String> {
        HashMap::from([("source".to_string(), self.source_document_id.clone())])
    }
}

/// Trait for document chunking strategies
///
/// Implementations must be deterministic: the same document and parameters
/// always yield the same chunks, so re-ingesting upserts over the old ids.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks, in document order
    fn chunk(&self, document: &Document) -> Result<Vec<Chunk>>;

    /// Returns the name of this chunking strategy
    fn name(&self) -> &str;
}

/// Number text pieces in order and tag them with the document id.
pub fn number_pieces<I, S>(document: &Document, pieces: I) -> Vec<Chunk>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let sequence_index = i + 1;
            Chunk {
                id: format!("{}_chunk{}", document.id, sequence_index),
                text: text.into(),
                sequence_index,
                source_document_id: document.id.clone(),
            }
        })
        .collect()
}

/// Reject window parameters that could not make forward progress.
pub(crate) fn validate_window(chunk_size: usize, chunk_overlap: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(Error::InvalidArgument(
            "chunk_size must be greater than zero".to_string(),
        ));
    }
    if chunk_overlap >= chunk_size {
        return Err(Error::InvalidArgument(format!(
            "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }
    Ok(())
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

mod fixed;
mod recursive;

pub use fixed::*;
pub use recursive::*;
