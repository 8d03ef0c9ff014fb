//! Text embedding
//!
//! Two backends, both behind the [`Embedder`] trait:
//!
//! - [`LocalEmbedder`]: ONNX models via the fastembed crate. The default,
//!   `all-MiniLM-L6-v2` (384 dimensions), is the same model Chroma uses as
//!   its default embedding function.
//! - [`OpenAiEmbedder`]: any OpenAI-compatible `/embeddings` endpoint,
//!   `text-embedding-3-small` (1536 dimensions) by default.
//!
//! # Usage
//!
//! ```ignore
//! use ragprimer_lib::embed::{Embedder, LocalEmbedder};
//!
//! let mut embedder = LocalEmbedder::new()?;
//!
//! // Embed documents (for indexing)
//! let doc_embeddings = embedder.embed_documents(&["Hello, world!", "Hola, mundo!"])?;
//!
//! // Embed query (for searching)
//! let query_embedding = embedder.embed_query("how are you?")?;
//! ```

use crate::Result;

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
pub trait Embedder: Send + Sync {
    /// Embed multiple documents for indexing
    ///
    /// Returns one embedding per input, in input order.
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single query for searching
    ///
    /// Note: Some models (like BGE) use different prompts for queries vs documents.
    /// This method handles that distinction.
    fn embed_query(&mut self, text: &str) -> Result<Embedding>;

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

impl<T: Embedder + ?Sized> Embedder for Box<T> {
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        (**self).embed_documents(texts)
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        (**self).embed_query(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

mod local;
mod openai;

pub use local::*;
pub use openai::*;
