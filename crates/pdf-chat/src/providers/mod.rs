//! Provider abstractions for embeddings, chat and retrieval
//!
//! The pipeline only talks to these traits, so the backend (OpenAI or a
//! local Ollama server) is chosen from configuration and tests use fakes.

pub mod embedding;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod openai;
pub mod retriever;

pub use embedding::Embedder;
pub use llm::ChatModel;
pub use local::IndexRetriever;
pub use retriever::Retriever;

use std::sync::Arc;

use crate::config::{ChatConfig, ProviderKind};
use crate::error::Result;

/// Build the embedder and chat model for the configured backend
pub fn from_config(config: &ChatConfig) -> Result<(Arc<dyn Embedder>, Arc<dyn ChatModel>)> {
    match config.provider {
        ProviderKind::OpenAi => {
            if config.openai.api_key.is_none() {
                tracing::warn!(
                    "{} is not set; embedding and chat calls will fail until it is provided",
                    crate::config::OPENAI_API_KEY_ENV
                );
            }
            let (embedder, chat) = openai::OpenAiProvider::new(config)?.split();
            Ok((Arc::new(embedder), Arc::new(chat)))
        }
        ProviderKind::Ollama => {
            let (embedder, chat) = ollama::OllamaProvider::new(config)?.split();
            Ok((Arc::new(embedder), Arc::new(chat)))
        }
    }
}
