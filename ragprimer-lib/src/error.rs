//! Error types for ragprimer

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for ragprimer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ragprimer operations
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied parameters that can never succeed
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to load or run the embedding model
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Failed to store or retrieve from vector store
    #[error("store error: {0}")]
    Store(String),

    /// The chat model failed to produce a completion
    #[error("chat error: {0}")]
    Chat(String),

    /// Filesystem access failed
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
