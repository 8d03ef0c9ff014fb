use tracing::debug;

use crate::chunk::{char_len, number_pieces, validate_window, Chunk, Chunker, Document};
use crate::Result;

/// Split `text` into windows of `chunk_size` characters, each starting
/// `chunk_size - chunk_overlap` characters after the previous one.
///
/// The last window is truncated to whatever text remains. Sizes count
/// `char`s, so a multi-byte character is never cut in half.
///
/// # Errors
/// [`Error::InvalidArgument`](crate::Error::InvalidArgument) when
/// `chunk_size` is zero or `chunk_overlap >= chunk_size`.
pub fn split(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<&str>> {
    validate_window(chunk_size, chunk_overlap)?;

    // byte offset of every char, plus one past the end
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let len = offsets.len() - 1;
    let stride = chunk_size - chunk_overlap;

    let mut chunks = Vec::with_capacity(len.div_ceil(stride));
    let mut start = 0;
    while start < len {
        let end = (start + chunk_size).min(len);
        chunks.push(&text[offsets[start]..offsets[end]]);
        start += stride;
    }
    Ok(chunks)
}

/// Split a document with [`split`] and number the pieces.
pub fn chunk_document(
    document: &Document,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Chunk>> {
    let pieces = split(&document.text, chunk_size, chunk_overlap)?;
    debug!(
        document = %document.id,
        chars = char_len(&document.text),
        chunks = pieces.len(),
        "split document"
    );
    Ok(number_pieces(document, pieces))
}

/// Fixed-size chunker - splits by character count
///
/// Good for: baseline experiments, consistent chunk sizes. Does not respect
/// word boundaries.
#[derive(Debug, Clone, Copy)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    overlap: usize,
}

impl FixedSizeChunker {
    /// Defaults used by the ingestion scripts this crate grew out of.
    pub const DEFAULT_CHUNK_SIZE: usize = 1000;
    pub const DEFAULT_OVERLAP: usize = 20;

    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        validate_window(chunk_size, overlap)?;
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[must_use]
    pub fn overlap(&self) -> usize {
        self.overlap
    }
}

impl Default for FixedSizeChunker {
    fn default() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            overlap: Self::DEFAULT_OVERLAP,
        }
    }
}

impl Chunker for FixedSizeChunker {
    fn name(&self) -> &str {
        "fixed"
    }

    fn chunk(&self, document: &Document) -> Result<Vec<Chunk>> {
        chunk_document(document, self.chunk_size, self.overlap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_split_with_overlap() {
        let chunks = split("abcdefghij", 4, 1).unwrap();
        assert_eq!(chunks, vec!["abcd", "defg", "ghij", "j"]);
    }

    #[test]
    fn test_split_shorter_than_chunk() {
        assert_eq!(split("hello", 10, 2).unwrap(), vec!["hello"]);
    }

    #[test]
    fn test_split_exact_chunk() {
        assert_eq!(split("hello", 5, 0).unwrap(), vec!["hello"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split("", 5, 1).unwrap().is_empty());
    }

    #[test]
    fn test_basic_chunking() {
        let content = "0123456789abcdefghij"; // 20 chars
        let chunks = split(content, 10, 0).unwrap();

        assert_eq!(chunks, vec!["0123456789", "abcdefghij"]);
    }

    #[test]
    fn test_overlap() {
        let content = "0123456789abcdefghij"; // 20 chars, stride=5
        let chunks = split(content, 10, 5).unwrap();

        // stride=5, so positions: 0, 5, 10, 15
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0], "0123456789"); // 0..10
        assert_eq!(chunks[1], "56789abcde"); // 5..15
        assert_eq!(chunks[2], "abcdefghij"); // 10..20
        assert_eq!(chunks[3], "fghij"); // 15..20 (truncated)
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(split("abc", 0, 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(split("abc", 3, 3), Err(Error::InvalidArgument(_))));
        assert!(matches!(split("", 2, 5), Err(Error::InvalidArgument(_))));
        assert!(FixedSizeChunker::new(10, 10).is_err());
    }

    #[test]
    fn test_unicode_safety() {
        let content = "Hello 👋 World"; // 13 chars, emoji is 4 bytes
        let chunks = split(content, 5, 0).unwrap();

        assert_eq!(chunks, vec!["Hello", " 👋 Wo", "rld"]);
    }

    #[test]
    fn test_window_invariants() {
        let text: String = ('a'..='z').cycle().take(103).collect();
        for size in 1..12 {
            for overlap in 0..size {
                let chunks = split(&text, size, overlap).unwrap();
                let stride = size - overlap;

                assert_eq!(chunks.len(), text.len().div_ceil(stride));
                for (i, chunk) in chunks.iter().enumerate() {
                    let start = i * stride;
                    assert!(chunk.len() <= size);
                    assert_eq!(*chunk, &text[start..(start + size).min(text.len())]);
                    // only windows that run into the end of the text are short
                    if start + size <= text.len() {
                        assert_eq!(chunk.len(), size);
                    }
                }
            }
        }
    }

    #[test]
    fn test_chunk_document_ids() {
        let doc = Document::new("doc1", "abcdefghij");
        let chunks = chunk_document(&doc, 4, 1).unwrap();

        let ids: Vec<_> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["doc1_chunk1", "doc1_chunk2", "doc1_chunk3", "doc1_chunk4"]);

        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "defg", "ghij", "j"]);

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence_index, i + 1);
            assert_eq!(chunk.source_document_id, "doc1");
        }
    }

    #[test]
    fn test_deterministic() {
        let chunker = FixedSizeChunker::new(7, 2).unwrap();
        let doc = Document::new("d", "the quick brown fox jumps over the lazy dog");

        assert_eq!(chunker.chunk(&doc).unwrap(), chunker.chunk(&doc).unwrap());
    }

    #[test]
    fn test_empty_content() {
        let chunker = FixedSizeChunker::default();
        let chunks = chunker.chunk(&Document::new("empty", "")).unwrap();
        assert!(chunks.is_empty());
    }
}
