//! Brute-force cosine vector index over the chunks of one Process action

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::providers::Embedder;
use crate::types::{ChunkSource, RawText, TextChunk};

/// An embedded chunk
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk: TextChunk,
    /// Pages the chunk was cut from
    pub sources: Vec<ChunkSource>,
    pub embedding: Vec<f32>,
}

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: TextChunk,
    /// Pages the chunk was cut from
    pub sources: Vec<ChunkSource>,
    /// Cosine similarity to the query (higher is better)
    pub similarity: f32,
}

/// Embedded chunks, queryable by cosine nearest neighbour.
///
/// Built wholesale from one chunk sequence and never mutated afterwards;
/// a new Process builds a new index.
#[derive(Debug)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimensions: usize,
    embed_model: String,
}

impl VectorIndex {
    /// Embed `chunks` in batches of `batch_size` and index them without
    /// source attribution
    pub async fn build(chunks: Vec<TextChunk>, embedder: &dyn Embedder, batch_size: usize) -> Result<Self> {
        let sources = vec![Vec::new(); chunks.len()];
        Self::build_entries(chunks, sources, embedder, batch_size).await
    }

    /// Like [`VectorIndex::build`], attributing each chunk to the pages of
    /// `raw` it overlaps
    pub async fn build_with_sources(
        chunks: Vec<TextChunk>,
        raw: &RawText,
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> Result<Self> {
        let sources = chunks
            .iter()
            .map(|c| raw.sources_for(c.char_start, c.char_end))
            .collect();
        Self::build_entries(chunks, sources, embedder, batch_size).await
    }

    async fn build_entries(
        chunks: Vec<TextChunk>,
        sources: Vec<Vec<ChunkSource>>,
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(Error::EmptyIndex);
        }

        let batch_size = batch_size.max(1);
        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());

        for (batch_no, batch) in chunks.chunks(batch_size).enumerate() {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let vectors = embedder.embed_batch(&texts).await?;

            if vectors.len() != texts.len() {
                return Err(Error::embedding(format!(
                    "Embedder returned {} vectors for {} chunks",
                    vectors.len(),
                    texts.len()
                )));
            }

            tracing::debug!("Embedded batch {} ({} chunks)", batch_no + 1, texts.len());
            embeddings.extend(vectors);
        }

        let dimensions = embeddings.first().map(|v| v.len()).unwrap_or(0);
        if dimensions == 0 {
            return Err(Error::embedding("Embedder returned empty vectors"));
        }
        if let Some(bad) = embeddings.iter().position(|v| v.len() != dimensions) {
            return Err(Error::embedding(format!(
                "Embedding {} has dimension {}, expected {}",
                bad,
                embeddings[bad].len(),
                dimensions
            )));
        }

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(sources)
            .zip(embeddings)
            .map(|((chunk, sources), embedding)| IndexEntry {
                chunk,
                sources,
                embedding,
            })
            .collect();

        tracing::info!(
            "Built vector index: {} chunks, {} dimensions ({} / {})",
            entries.len(),
            dimensions,
            embedder.name(),
            embedder.model()
        );

        Ok(Self {
            entries,
            dimensions,
            embed_model: embedder.model().to_string(),
        })
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension shared by every entry
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Model that produced the embeddings
    pub fn embed_model(&self) -> &str {
        &self.embed_model
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Up to `top_k` entries most similar to `query`, best first.
    ///
    /// Equal scores are ordered by chunk index, so identical indexes answer
    /// identically.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if query.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Query embedding has dimension {}, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(query, &e.embedding)))
            .collect();

        scored.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => self.entries[a.0].chunk.index.cmp(&self.entries[b.0].chunk.index),
            other => other,
        });
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(i, similarity)| {
                let entry = &self.entries[i];
                SearchResult {
                    chunk: entry.chunk.clone(),
                    sources: entry.sources.clone(),
                    similarity,
                }
            })
            .collect())
    }
}

/// Cosine similarity; 0.0 for mismatched, empty or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = (norm_a * norm_b).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}
