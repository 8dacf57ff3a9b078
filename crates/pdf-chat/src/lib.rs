//! pdf-chat: chat with multiple PDF documents
//!
//! Uploaded PDFs are extracted page by page, split into overlapping
//! character chunks, embedded into an in-memory vector index per session,
//! and questions are answered by an LLM conditioned on retrieved chunks and
//! the session's conversation history.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod types;

pub use config::ChatConfig;
pub use error::{Error, Result};
pub use generation::{ChainOptions, ConversationChain};
pub use ingestion::{extract_raw_text, IngestPipeline, TextChunker};
pub use providers::{ChatModel, Embedder, Retriever};
pub use retrieval::{SearchResult, VectorIndex};
pub use server::{build_router, state::AppState, ChatServer};
pub use session::{ConversationMemory, SessionContext, SessionStore};
pub use types::{ChatAnswer, ChatMessage, RawText, TextChunk, UploadedDocument};
