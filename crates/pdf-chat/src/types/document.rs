//! Document, raw text and chunk types with source tracking

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A file received from the upload control
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Filename as uploaded by the user
    pub filename: String,
    /// Raw file bytes
    pub data: Bytes,
}

impl UploadedDocument {
    /// Create an uploaded document
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// SHA-256 of the file bytes, hex encoded
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        format!("{:x}", hasher.finalize())
    }
}

/// Where a run of characters in [`RawText`] came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpan {
    /// Source filename
    pub filename: String,
    /// Page number (1-indexed)
    pub page_number: u32,
    /// First character offset in the raw text
    pub char_start: usize,
    /// One past the last character offset
    pub char_end: usize,
}

/// Concatenated text of every page of every uploaded document
#[derive(Debug, Clone, Default)]
pub struct RawText {
    text: String,
    char_len: usize,
    pages: Vec<PageSpan>,
}

impl RawText {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page's text. Pages without text leave no span.
    pub fn push_page(&mut self, filename: &str, page_number: u32, content: &str) {
        let added = content.chars().count();
        if added == 0 {
            return;
        }

        self.pages.push(PageSpan {
            filename: filename.to_string(),
            page_number,
            char_start: self.char_len,
            char_end: self.char_len + added,
        });
        self.text.push_str(content);
        self.char_len += added;
    }

    /// The accumulated text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// True when nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Page spans in append order
    pub fn pages(&self) -> &[PageSpan] {
        &self.pages
    }

    /// Pages overlapping the character range `[start, end)`
    pub fn sources_for(&self, start: usize, end: usize) -> Vec<ChunkSource> {
        self.pages
            .iter()
            .filter(|p| p.char_start < end && p.char_end > start)
            .map(|p| ChunkSource {
                filename: p.filename.clone(),
                page_number: p.page_number,
            })
            .collect()
    }

    /// Consume into the plain string
    pub fn into_string(self) -> String {
        self.text
    }
}

/// A bounded substring of [`RawText`]; the unit of embedding and retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Position in the chunk sequence
    pub index: usize,
    /// Chunk text
    pub content: String,
    /// First character offset in the raw text
    pub char_start: usize,
    /// One past the last character offset
    pub char_end: usize,
}

impl TextChunk {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.char_end - self.char_start
    }
}

/// Source page of a chunk, used for attribution in answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Source filename
    pub filename: String,
    /// Page number (1-indexed)
    pub page_number: u32,
}

impl ChunkSource {
    /// Format source for display
    pub fn format_citation(&self) -> String {
        format!("{}, Page {}", self.filename, self.page_number)
    }
}

/// Summary of one uploaded document after extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Filename as uploaded
    pub filename: String,
    /// SHA-256 of the file bytes
    pub content_hash: String,
    /// File size in bytes
    pub file_size: u64,
    /// Pages in the PDF
    pub total_pages: u32,
    /// Pages that produced text
    pub pages_with_text: u32,
    /// Characters contributed to the raw text
    pub characters: usize,
    /// True when the same bytes were already uploaded in this batch
    #[serde(default)]
    pub duplicate: bool,
}
