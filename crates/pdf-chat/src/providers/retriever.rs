//! Retrieval capability

use async_trait::async_trait;
use crate::error::Result;
use crate::retrieval::SearchResult;

/// Finds the chunks most relevant to a query
///
/// Implementations:
/// - `IndexRetriever`: session vector index + embedder
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return up to `top_k` matches, best first
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>>;
}
