use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use crate::embed::{Embedder, Embedding};
use crate::{Error, Result};

/// Models available to [`LocalEmbedder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LocalModel {
    /// sentence-transformers/all-MiniLM-L6-v2, 384 dimensions
    #[default]
    MiniLm,
    /// BAAI/bge-large-en-v1.5, 1024 dimensions, up to 512 tokens
    BgeLarge,
}

impl LocalModel {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MiniLm => "sentence-transformers/all-MiniLM-L6-v2",
            Self::BgeLarge => "BAAI/bge-large-en-v1.5",
        }
    }

    #[must_use]
    pub fn dimension(self) -> usize {
        match self {
            Self::MiniLm => 384,
            Self::BgeLarge => 1024,
        }
    }

    /// Text actually fed to the model for a search query.
    #[must_use]
    pub fn query_text(self, text: &str) -> String {
        match self {
            // BGE uses a special prompt prefix for queries to improve retrieval
            Self::BgeLarge => {
                format!("Represent this sentence for searching relevant passages: {text}")
            }
            Self::MiniLm => text.to_string(),
        }
    }

    fn fastembed_model(self) -> EmbeddingModel {
        match self {
            Self::MiniLm => EmbeddingModel::AllMiniLML6V2,
            Self::BgeLarge => EmbeddingModel::BGELargeENV15,
        }
    }
}

/// Local embedder running ONNX models through fastembed.
pub struct LocalEmbedder {
    model: TextEmbedding,
    kind: LocalModel,
}

impl LocalEmbedder {
    /// Create an embedder with the default model (all-MiniLM-L6-v2).
    ///
    /// Downloads the model on first use (~90MB).
    pub fn new() -> Result<Self> {
        Self::with_model(LocalModel::default())
    }

    /// Create an embedder for a specific model.
    pub fn with_model(kind: LocalModel) -> Result<Self> {
        info!(model = kind.name(), "loading local embedding model");
        let opts = InitOptions::new(kind.fastembed_model()).with_show_download_progress(true);

        TextEmbedding::try_new(opts)
            .map(|model| Self { model, kind })
            .map_err(|e| Error::Embedding(e.to_string()))
    }
}

impl Embedder for LocalEmbedder {
    fn model_name(&self) -> &str {
        self.kind.name()
    }

    fn dimension(&self) -> usize {
        self.kind.dimension()
    }

    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.model
            .embed(texts, None)
            .map_err(|e| Error::Embedding(e.to_string()))
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        let query_text = self.kind.query_text(text);

        self.model
            .embed(vec![query_text], None)
            .map_err(|e| Error::Embedding(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("model returned no embeddings".to_string()))
    }
}
