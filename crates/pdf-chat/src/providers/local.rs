//! Retriever over a session's in-memory vector index

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::retrieval::{SearchResult, VectorIndex};

use super::embedding::Embedder;
use super::retriever::Retriever;

/// Embeds the query and searches a [`VectorIndex`]
pub struct IndexRetriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
    min_similarity: Option<f32>,
}

impl IndexRetriever {
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            index,
            embedder,
            min_similarity: None,
        }
    }

    /// Drop matches scoring below `threshold`
    pub fn with_min_similarity(mut self, threshold: Option<f32>) -> Self {
        self.min_similarity = threshold;
        self
    }
}

#[async_trait]
impl Retriever for IndexRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;
        let mut results = self.index.search(&query_embedding, top_k)?;

        if let Some(threshold) = self.min_similarity {
            results.retain(|r| r.similarity >= threshold);
        }

        tracing::debug!(
            "Retrieved {} chunks (top_k {}, best {:.3})",
            results.len(),
            top_k,
            results.first().map(|r| r.similarity).unwrap_or(0.0)
        );

        Ok(results)
    }
}
