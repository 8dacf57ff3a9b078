//! Answer generation: LLM clients, prompts and the conversation chain

pub mod chain;
pub mod ollama;
pub mod openai;
pub mod prompt;
mod retry;

pub use chain::{ChainOptions, ConversationChain};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use prompt::PromptBuilder;
