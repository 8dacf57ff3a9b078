//! Response types for the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

use super::document::{ChunkSource, DocumentSummary};
use super::message::ChatMessage;

/// Maximum snippet length in graphemes
pub const SNIPPET_LEN: usize = 240;

/// A retrieved chunk as shown next to an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Index of the chunk in the session's chunk sequence
    pub chunk_index: usize,
    /// Pages the chunk was cut from
    pub pages: Vec<ChunkSource>,
    /// Cosine similarity to the question
    pub similarity: f32,
    /// Leading text of the chunk
    pub snippet: String,
}

impl SourceRef {
    /// Build a source reference, truncating the chunk text into a snippet
    pub fn new(chunk_index: usize, pages: Vec<ChunkSource>, similarity: f32, content: &str) -> Self {
        Self {
            chunk_index,
            pages,
            similarity,
            snippet: truncate_snippet(content, SNIPPET_LEN),
        }
    }
}

/// Truncate to at most `max_graphemes`, preferring a word boundary
pub fn truncate_snippet(text: &str, max_graphemes: usize) -> String {
    let text = text.trim();
    if text.graphemes(true).count() <= max_graphemes {
        return text.to_string();
    }

    let cut: String = text.graphemes(true).take(max_graphemes).collect();
    match cut.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => format!("{}...", cut[..pos].trim_end()),
        _ => format!("{}...", cut),
    }
}

/// Answer to one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAnswer {
    /// Generated reply
    pub answer: String,
    /// Chunks the reply was conditioned on, best first
    pub sources: Vec<SourceRef>,
    /// Messages in session memory after this turn
    pub history_len: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Result of a Process action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// Per-document extraction summary
    pub documents: Vec<DocumentSummary>,
    /// Characters of raw text extracted
    pub total_characters: usize,
    /// Chunks embedded into the new index
    pub total_chunks: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Returned when a session is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

/// Snapshot of a session's state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    /// Documents from the most recent successful Process
    pub documents: Vec<DocumentSummary>,
    /// Entries in the current index (0 when nothing processed)
    pub indexed_chunks: usize,
    /// Messages in memory
    pub history_len: usize,
}

/// Conversation messages of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub messages: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_snippet_short_text_unchanged() {
        assert_eq!(truncate_snippet("  short text ", 20), "short text");
    }

    #[test]
    fn test_truncate_snippet() {
        let snippet = "This is a very long snippet that needs to be truncated.";
        let truncated = truncate_snippet(snippet, 20);

        assert!(truncated.len() <= 23); // 20 + "..."
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated, "This is a very long...");
    }

    #[test]
    fn test_truncate_snippet_keeps_graphemes_whole() {
        let text = "e\u{301}".repeat(10);
        let truncated = truncate_snippet(&text, 3);
        assert_eq!(truncated, format!("{}...", "e\u{301}".repeat(3)));
    }
}
