//! Core types for the PDF chat service

pub mod document;
pub mod message;
pub mod query;
pub mod response;

pub use document::{ChunkSource, DocumentSummary, PageSpan, RawText, TextChunk, UploadedDocument};
pub use message::{ChatMessage, Role};
pub use query::ChatRequest;
pub use response::{ChatAnswer, HistoryResponse, ProcessResponse, SessionCreated, SessionSummary, SourceRef};
