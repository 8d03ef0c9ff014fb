//! High-level search interface
//!
//! Combines embedder and store into a unified search API, and optionally
//! hands the retrieved chunks to a chat model.
//!
//! # Usage
//!
//! ```ignore
//! use ragprimer_lib::search::SearchEngine;
//!
//! let mut engine = SearchEngine::new(embedder, store);
//! engine.ingest(&documents, &chunker)?;
//! let results = engine.search("how much did microsoft raise?", 3)?;
//!
//! // Retrieval-augmented answer
//! let answer = engine.ask(&mut chat, "how much did microsoft raise?", 3)?;
//! println!("{}", answer.text);
//! ```

use tracing::info;

use crate::chat::{rag_messages, ChatModel};
use crate::chunk::{Chunk, Chunker, Document};
use crate::embed::Embedder;
use crate::ingest::{self, IngestReport};
use crate::store::{SearchResult, VectorStore};
use crate::Result;

/// A chat model's answer with the chunks it was given as context
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<SearchResult>,
}

/// High-level search engine combining embedding and storage.
pub struct SearchEngine<E: Embedder, S: VectorStore> {
    embedder: E,
    store: S,
}

impl<E: Embedder, S: VectorStore> SearchEngine<E, S> {
    /// Create a new search engine over an injected embedder and store.
    #[must_use]
    pub fn new(embedder: E, store: S) -> Self {
        Self { embedder, store }
    }

    /// Index chunks by computing embeddings and storing them.
    pub fn index(&mut self, chunks: &[Chunk]) -> Result<()> {
        ingest::index(chunks, &mut self.embedder, &mut self.store)
    }

    /// Chunk, embed and store documents.
    pub fn ingest(
        &mut self,
        documents: &[Document],
        chunker: &dyn Chunker,
    ) -> Result<IngestReport> {
        ingest::ingest(documents, chunker, &mut self.embedder, &mut self.store)
    }

    /// Search for chunks similar to the query using vector similarity.
    pub fn search(&mut self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed_query(query)?;
        self.store.query(&query_embedding, k)
    }

    /// Retrieve the top `k` chunks for `question` and let the chat model answer from them.
    pub fn ask<C>(&mut self, chat: &mut C, question: &str, k: usize) -> Result<Answer>
    where
        C: ChatModel + ?Sized,
    {
        let sources = self.search(question, k)?;
        info!(
            question,
            sources = sources.len(),
            model = chat.model_name(),
            "answering with retrieved context"
        );

        let text = chat.complete(&rag_messages(question, &sources))?;
        Ok(Answer { text, sources })
    }

    /// Returns the number of indexed chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no chunks are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns a reference to the embedder.
    #[must_use]
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Returns a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a mutable reference to the store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
