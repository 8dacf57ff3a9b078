//! Ingestion pipeline orchestration

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::types::{TextChunk, UploadedDocument};

use super::chunker::TextChunker;
use super::parser::{extract_documents, Extraction};

/// Output of one Process action, before embedding
#[derive(Debug, Clone)]
pub struct IngestOutput {
    /// Raw text and per-document summaries
    pub extraction: Extraction,
    /// Chunks cut from the raw text
    pub chunks: Vec<TextChunk>,
}

/// Extraction followed by chunking
pub struct IngestPipeline {
    chunker: TextChunker,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(chunker: TextChunker) -> Self {
        Self { chunker }
    }

    /// Create from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Ok(Self::new(TextChunker::from_config(config)?))
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Extract every document and chunk the concatenated text
    pub fn ingest(&self, documents: &[UploadedDocument]) -> Result<IngestOutput> {
        let extraction = extract_documents(documents)?;
        // Whitespace alone gives nothing to retrieve.
        let chunks = if extraction.raw.as_str().trim().is_empty() {
            Vec::new()
        } else {
            self.chunker.split(extraction.raw.as_str())
        };

        tracing::info!(
            "Ingested {} documents: {} characters, {} chunks",
            documents.len(),
            extraction.raw.char_len(),
            chunks.len()
        );

        Ok(IngestOutput { extraction, chunks })
    }
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::new(TextChunker::default())
    }
}
