//! Request types

use serde::{Deserialize, Serialize};

/// Question submitted from the query input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The question to answer
    pub question: String,

    /// Override the configured number of retrieved chunks
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl ChatRequest {
    /// Create a new request
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            top_k: None,
        }
    }
}
