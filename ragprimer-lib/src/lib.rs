//! ragprimer - building blocks for basic retrieval-augmented generation
//!
//! # Architecture
//!
//! ```text
//! Directory -> Loader -> Chunker -> Embedder -> Store
//!                                                 |
//! Question -> Embedder -> Search <----------------+
//!                            |
//!                   Context -> ChatModel -> Answer
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ragprimer_lib::{
//!     chunk::FixedSizeChunker, embed::LocalEmbedder, search::SearchEngine,
//!     store::MemoryStore,
//! };
//!
//! let documents = ragprimer_lib::loader::load_documents("./data/new_articles", "txt")?;
//! let chunker = FixedSizeChunker::new(1000, 20)?;
//!
//! let mut engine = SearchEngine::new(LocalEmbedder::new()?, MemoryStore::new());
//! engine.ingest(&documents, &chunker)?;
//!
//! let results = engine.search("how much did microsoft raise?", 3)?;
//! ```

pub mod chat;
pub mod chunk;
pub mod embed;
pub mod error;
pub mod ingest;
pub mod loader;
mod openai;
pub mod search;
pub mod store;

pub use error::{Error, Result};
