//! Document ingestion: chunk -> embed -> upsert

use tracing::{debug, info};

use crate::chunk::{Chunk, Chunker, Document};
use crate::embed::Embedder;
use crate::store::VectorStore;
use crate::Result;

/// Counts from one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
}

/// Chunk, embed and upsert every document.
///
/// Each document is embedded in one call and upserted before the next one
/// is chunked. The first error aborts the run; documents already upserted
/// stay in the store.
pub fn ingest<E, S>(
    documents: &[Document],
    chunker: &dyn Chunker,
    embedder: &mut E,
    store: &mut S,
) -> Result<IngestReport>
where
    E: Embedder + ?Sized,
    S: VectorStore + ?Sized,
{
    info!(
        documents = documents.len(),
        chunker = chunker.name(),
        model = embedder.model_name(),
        "ingesting documents"
    );

    let mut report = IngestReport::default();
    for document in documents {
        let chunks = chunker.chunk(document)?;
        index(&chunks, embedder, store)?;
        debug!(document = %document.id, chunks = chunks.len(), "ingested document");

        report.documents += 1;
        report.chunks += chunks.len();
    }

    info!(
        documents = report.documents,
        chunks = report.chunks,
        stored = store.len(),
        "ingestion finished"
    );
    Ok(report)
}

/// Embed already chunked text and upsert it.
pub fn index<E, S>(chunks: &[Chunk], embedder: &mut E, store: &mut S) -> Result<()>
where
    E: Embedder + ?Sized,
    S: VectorStore + ?Sized,
{
    if chunks.is_empty() {
        return Ok(());
    }

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    let embeddings = embedder.embed_documents(&texts)?;
    store.upsert(chunks, &embeddings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::FixedSizeChunker;
    use crate::embed::Embedding;
    use crate::store::MemoryStore;
    use crate::Error;

    /// Counts calls; embeds text as [len, vowels].
    #[derive(Default)]
    struct CountingEmbedder {
        calls: usize,
        fail: bool,
    }

    impl Embedder for CountingEmbedder {
        fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
            self.calls += 1;
            if self.fail {
                return Err(Error::Embedding("service unavailable".to_string()));
            }
            Ok(texts.iter().map(|t| self.vector(t)).collect())
        }

        fn embed_query(&mut self, text: &str) -> Result<Embedding> {
            Ok(self.vector(text))
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "counting"
        }
    }

    impl CountingEmbedder {
        fn vector(&self, text: &str) -> Embedding {
            let vowels = text.chars().filter(|c| "aeiou".contains(*c)).count();
            vec![text.len() as f32, vowels as f32]
        }
    }

    #[test]
    fn test_ingest_counts_chunks() {
        let docs = vec![
            Document::new("doc1", "abcdefghij"),
            Document::new("doc2", "hello"),
        ];
        let chunker = FixedSizeChunker::new(4, 1).unwrap();
        let mut embedder = CountingEmbedder::default();
        let mut store = MemoryStore::new();

        let report = ingest(&docs, &chunker, &mut embedder, &mut store).unwrap();

        assert_eq!(report, IngestReport { documents: 2, chunks: 6 });
        assert_eq!(store.len(), 6);
        assert_eq!(embedder.calls, 2);
        assert_eq!(store.get("doc1_chunk4").unwrap().text, "j");
        assert_eq!(store.get("doc2_chunk2").unwrap().text, "lo");
    }

    #[test]
    fn test_empty_document_skips_embedder() {
        let docs = vec![Document::new("empty", "")];
        let mut embedder = CountingEmbedder::default();
        let mut store = MemoryStore::new();

        let chunker = FixedSizeChunker::default();
        let report = ingest(&docs, &chunker, &mut embedder, &mut store).unwrap();

        assert_eq!(report, IngestReport { documents: 1, chunks: 0 });
        assert_eq!(embedder.calls, 0);
    }

    #[test]
    fn test_reingest_is_idempotent() {
        let docs = vec![Document::new("doc1", "the same text twice")];
        let chunker = FixedSizeChunker::new(5, 0).unwrap();
        let mut embedder = CountingEmbedder::default();
        let mut store = MemoryStore::new();

        ingest(&docs, &chunker, &mut embedder, &mut store).unwrap();
        let first = store.len();
        ingest(&docs, &chunker, &mut embedder, &mut store).unwrap();

        assert_eq!(store.len(), first);
    }

    #[test]
    fn test_embedder_error_propagates() {
        let docs = vec![Document::new("doc1", "text")];
        let mut embedder = CountingEmbedder {
            fail: true,
            ..Default::default()
        };
        let mut store = MemoryStore::new();

        let chunker = FixedSizeChunker::default();
        let err = ingest(&docs, &chunker, &mut embedder, &mut store).unwrap_err();

        assert!(matches!(err, Error::Embedding(_)));
        assert!(store.is_empty());
    }
}
