//! Explicit state of one browser session

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::retrieval::VectorIndex;
use crate::types::{DocumentSummary, SessionSummary};

use super::memory::ConversationMemory;

/// Everything one session owns: its current index and its conversation
#[derive(Debug)]
pub struct SessionContext {
    pub id: Uuid,
    /// Index from the most recent successful Process, if any
    pub index: Option<Arc<VectorIndex>>,
    pub memory: ConversationMemory,
    /// Documents behind the current index
    pub documents: Vec<DocumentSummary>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(max_messages: usize) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            index: None,
            memory: ConversationMemory::new(max_messages),
            documents: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    /// Mark the session as used now
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Install a freshly built index. The old index is dropped wholesale and
    /// the conversation starts over, since it referred to other documents.
    pub fn replace_index(&mut self, index: VectorIndex, documents: Vec<DocumentSummary>) {
        tracing::info!(
            "Session {}: index replaced ({} chunks), conversation reset",
            self.id,
            index.len()
        );
        self.index = Some(Arc::new(index));
        self.documents = documents;
        self.memory.clear();
        self.touch();
    }

    /// Chunks in the current index
    pub fn indexed_chunks(&self) -> usize {
        self.index.as_ref().map(|i| i.len()).unwrap_or(0)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            created_at: self.created_at,
            last_active: self.last_active,
            documents: self.documents.clone(),
            indexed_chunks: self.indexed_chunks(),
            history_len: self.memory.len(),
        }
    }
}
