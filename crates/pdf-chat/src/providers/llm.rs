//! Chat model capability

use async_trait::async_trait;
use crate::error::Result;
use crate::types::ChatMessage;

/// Generates the next assistant message of a conversation
///
/// Implementations:
/// - `OpenAiChatModel`: OpenAI chat completions
/// - `OllamaChatModel`: Local Ollama server
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Reply to `messages` (system, history and the new question, in order)
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
