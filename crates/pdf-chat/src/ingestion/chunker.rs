//! Character-window text chunking with fixed overlap

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::TextChunk;

/// Splits raw text into overlapping chunks measured in characters.
///
/// A chunk covers at most `chunk_size` characters. When the window does not
/// reach the end of the text, the chunk ends right after the last separator
/// inside the window, as long as that keeps it longer than the overlap;
/// otherwise it is cut at the window edge. The next chunk always starts
/// `chunk_overlap` characters before the previous one ended.
#[derive(Debug, Clone)]
pub struct TextChunker {
    separator: String,
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a chunker, rejecting sizes that cannot make progress
    pub fn new(separator: impl Into<String>, chunk_size: usize, overlap: usize) -> Result<Self> {
        let separator = separator.into();
        if chunk_size == 0 {
            return Err(Error::Config("chunk size must be positive".to_string()));
        }
        if overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, chunk_size
            )));
        }
        if separator.is_empty() {
            return Err(Error::Config("chunk separator must not be empty".to_string()));
        }

        Ok(Self {
            separator,
            chunk_size,
            overlap,
        })
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.separator.clone(), config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split text into ordered chunks. Empty text yields no chunks.
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        // Byte offset of every character boundary, including the end.
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(b, _)| b)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = offsets.len() - 1;

        if total == 0 {
            return Vec::new();
        }

        let separator_ends = self.separator_ends(text, &offsets);
        let mut chunks = Vec::with_capacity(total / (self.chunk_size - self.overlap) + 1);
        let mut start = 0usize;

        loop {
            let hard_end = (start + self.chunk_size).min(total);
            let end = if hard_end == total {
                total
            } else {
                self.break_point(&separator_ends, start, hard_end)
                    .unwrap_or(hard_end)
            };

            chunks.push(TextChunk {
                index: chunks.len(),
                content: text[offsets[start]..offsets[end]].to_string(),
                char_start: start,
                char_end: end,
            });

            if end == total {
                break;
            }
            start = end - self.overlap;
        }

        tracing::debug!(
            "Split {} characters into {} chunks (size {}, overlap {})",
            total,
            chunks.len(),
            self.chunk_size,
            self.overlap
        );

        chunks
    }

    /// Character offsets just past each separator occurrence, ascending
    fn separator_ends(&self, text: &str, offsets: &[usize]) -> Vec<usize> {
        text.match_indices(self.separator.as_str())
            .filter_map(|(byte_start, sep)| offsets.binary_search(&(byte_start + sep.len())).ok())
            .collect()
    }

    /// Last separator end inside `(start + overlap, hard_end]`
    fn break_point(&self, separator_ends: &[usize], start: usize, hard_end: usize) -> Option<usize> {
        let upto = separator_ends.partition_point(|&e| e <= hard_end);
        separator_ends[..upto]
            .last()
            .copied()
            .filter(|&e| e > start + self.overlap)
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            separator: "\n".to_string(),
            chunk_size: 1000,
            overlap: 200,
        }
    }
}
