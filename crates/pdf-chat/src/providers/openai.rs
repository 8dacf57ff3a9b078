//! OpenAI-based providers for embeddings and chat

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::generation::OpenAiClient;
use crate::types::ChatMessage;

use super::embedding::Embedder;
use super::llm::ChatModel;

/// OpenAI embedding provider
pub struct OpenAiEmbedder {
    client: Arc<OpenAiClient>,
}

impl OpenAiEmbedder {
    pub fn from_client(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client
            .embed_batch(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| Error::embedding("Empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.client.embed_batch(texts).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        self.client.embed_model()
    }
}

/// OpenAI chat completion provider
pub struct OpenAiChatModel {
    client: Arc<OpenAiClient>,
}

impl OpenAiChatModel {
    pub fn from_client(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        self.client.chat(messages).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        self.client.chat_model()
    }
}

/// Combined OpenAI provider sharing one HTTP client
pub struct OpenAiProvider {
    embedder: OpenAiEmbedder,
    chat: OpenAiChatModel,
}

impl OpenAiProvider {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = Arc::new(OpenAiClient::new(config)?);
        Ok(Self {
            embedder: OpenAiEmbedder::from_client(Arc::clone(&client)),
            chat: OpenAiChatModel::from_client(client),
        })
    }

    /// Split into separate providers
    pub fn split(self) -> (OpenAiEmbedder, OpenAiChatModel) {
        (self.embedder, self.chat)
    }
}
