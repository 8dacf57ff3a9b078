//! Ollama-based providers for embeddings and chat
//!
//! Wraps [`OllamaClient`] to implement the provider traits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::Result;
use crate::generation::OllamaClient;
use crate::types::ChatMessage;

use super::embedding::Embedder;
use super::llm::ChatModel;

/// Ollama embedding provider using nomic-embed-text or similar models
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
}

impl OllamaEmbedder {
    /// Create from existing OllamaClient
    pub fn from_client(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    // No batch endpoint on /api/embeddings; the default sequential
    // embed_batch applies.

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        self.client.embed_model()
    }
}

/// Ollama chat model provider
pub struct OllamaChatModel {
    client: Arc<OllamaClient>,
}

impl OllamaChatModel {
    /// Create from existing OllamaClient
    pub fn from_client(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatModel for OllamaChatModel {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        self.client.chat(messages).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        self.client.chat_model()
    }
}

/// Combined Ollama provider that shares a single client for embeddings and chat
pub struct OllamaProvider {
    embedder: OllamaEmbedder,
    chat: OllamaChatModel,
}

impl OllamaProvider {
    /// Create a new combined Ollama provider
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = Arc::new(OllamaClient::new(config)?);
        Ok(Self {
            embedder: OllamaEmbedder::from_client(Arc::clone(&client)),
            chat: OllamaChatModel::from_client(client),
        })
    }

    /// Split into separate providers
    pub fn split(self) -> (OllamaEmbedder, OllamaChatModel) {
        (self.embedder, self.chat)
    }
}
