//! In-memory similarity retrieval

mod index;

pub use index::{cosine_similarity, IndexEntry, SearchResult, VectorIndex};

#[cfg(test)]
pub(crate) use index::tests::LetterEmbedder;
