//! Prompt templates for conversational retrieval

use crate::retrieval::SearchResult;
use crate::types::ChatMessage;

/// System instructions sent ahead of every turn
const SYSTEM_INSTRUCTIONS: &str = r#"You are a helpful assistant answering questions about documents the user has uploaded.

RULES:
1. Use the CONTEXT below as your primary source of facts
2. If the context does not contain the answer, say that the uploaded documents do not cover it
3. Use the earlier conversation to resolve follow-up questions ("it", "that section", ...)
4. When you rely on a passage, mention its source as [filename, Page X] if one is given
5. Be concise"#;

/// Prompt builder for conversational RAG
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from search results
    pub fn build_context(results: &[SearchResult]) -> String {
        if results.is_empty() {
            return "(no matching passages)".to_string();
        }

        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            let sources = result
                .sources
                .iter()
                .map(|s| s.format_citation())
                .collect::<Vec<_>>()
                .join("; ");
            let label = if sources.is_empty() {
                format!("chunk {}", result.chunk.index)
            } else {
                sources
            };

            context.push_str(&format!(
                "[{}] {}\n\nContent:\n{}\n\n---\n\n",
                i + 1,
                label,
                result.chunk.content.trim()
            ));
        }

        context
    }

    /// System message carrying the instructions and retrieved context
    pub fn system_message(results: &[SearchResult]) -> ChatMessage {
        ChatMessage::system(format!(
            "{}\n\nCONTEXT FROM DOCUMENTS:\n{}",
            SYSTEM_INSTRUCTIONS,
            Self::build_context(results)
        ))
    }

    /// Full message list: system + context, prior history, then the question
    pub fn build_messages(results: &[SearchResult], history: &[ChatMessage], question: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Self::system_message(results));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(question));
        messages
    }
}
