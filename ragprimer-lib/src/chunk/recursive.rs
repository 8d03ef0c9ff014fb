use std::collections::VecDeque;

use crate::chunk::{char_len, number_pieces, split, validate_window, Chunk, Chunker, Document};
use crate::{Error, Result};

/// Separators tried in order: paragraphs, then lines.
pub const DEFAULT_SEPARATORS: [&str; 2] = ["\n\n", "\n"];

/// Recursive separator chunker - splits on paragraph boundaries, then lines
///
/// Good for: news articles, prose content
///
/// Pieces are merged back together up to `chunk_size` characters. A piece
/// that is still too long is split on the next separator, and finally with
/// fixed windows once no separators are left.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    overlap: usize,
    separators: Vec<String>,
}

impl RecursiveChunker {
    pub fn new(chunk_size: usize, overlap: usize, separators: Vec<String>) -> Result<Self> {
        validate_window(chunk_size, overlap)?;
        if separators.iter().any(String::is_empty) {
            return Err(Error::InvalidArgument(
                "separators must not be empty".to_string(),
            ));
        }
        Ok(Self {
            chunk_size,
            overlap,
            separators,
        })
    }

    pub fn with_default_separators(chunk_size: usize, overlap: usize) -> Result<Self> {
        Self::new(
            chunk_size,
            overlap,
            DEFAULT_SEPARATORS.iter().map(ToString::to_string).collect(),
        )
    }

    /// Split text into pieces of at most `chunk_size` characters.
    pub fn split_text(&self, text: &str) -> Result<Vec<String>> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Result<Vec<String>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        if char_len(trimmed) <= self.chunk_size {
            return Ok(vec![trimmed.to_string()]);
        }

        let Some(pos) = separators.iter().position(|s| trimmed.contains(s.as_str())) else {
            let windows = split(trimmed, self.chunk_size, self.overlap)?;
            return Ok(windows
                .into_iter()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect());
        };
        let separator = separators[pos].as_str();
        let remaining = &separators[pos + 1..];

        let mut chunks = Vec::new();
        let mut pending = Vec::new();
        for piece in trimmed.split(separator).map(str::trim).filter(|p| !p.is_empty()) {
            if char_len(piece) <= self.chunk_size {
                pending.push(piece);
                continue;
            }
            // flush what we have so document order is kept
            chunks.extend(self.merge(&pending, separator));
            pending.clear();
            chunks.extend(self.split_recursive(piece, remaining)?);
        }
        chunks.extend(self.merge(&pending, separator));

        Ok(chunks)
    }

    /// Greedily join pieces (each already within `chunk_size`) with the
    /// separator, carrying up to `overlap` characters of trailing pieces into
    /// the next chunk.
    fn merge(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut window_len = 0;

        for &piece in pieces {
            let piece_len = char_len(piece);
            if !window.is_empty() && window_len + sep_len + piece_len > self.chunk_size {
                chunks.push(join(&window, separator));

                while window_len > self.overlap
                    || (!window.is_empty() && window_len + sep_len + piece_len > self.chunk_size)
                {
                    let Some(first) = window.pop_front() else {
                        break;
                    };
                    window_len -= char_len(first);
                    if !window.is_empty() {
                        window_len -= sep_len;
                    }
                }
            }

            window_len = if window.is_empty() {
                piece_len
            } else {
                window_len + sep_len + piece_len
            };
            window.push_back(piece);
        }

        if !window.is_empty() {
            chunks.push(join(&window, separator));
        }
        chunks
    }
}

fn join(window: &VecDeque<&str>, separator: &str) -> String {
    window.iter().copied().collect::<Vec<_>>().join(separator)
}

impl Chunker for RecursiveChunker {
    fn name(&self) -> &str {
        "recursive"
    }

    fn chunk(&self, document: &Document) -> Result<Vec<Chunk>> {
        let pieces = self.split_text(&document.text)?;
        Ok(number_pieces(document, pieces))
    }
}
