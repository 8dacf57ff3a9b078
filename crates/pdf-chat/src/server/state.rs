//! Application state for the chat server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::Result;
use crate::ingestion::IngestPipeline;
use crate::providers::{self, ChatModel, Embedder};
use crate::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ChatConfig,
    /// Embedding provider (OpenAI or Ollama)
    embedder: Arc<dyn Embedder>,
    /// Chat model provider (OpenAI or Ollama)
    chat_model: Arc<dyn ChatModel>,
    /// Extraction and chunking
    pipeline: Arc<IngestPipeline>,
    /// Live sessions
    sessions: SessionStore,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state with the providers selected by `config.provider`
    pub fn new(config: ChatConfig) -> Result<Self> {
        tracing::info!("Initializing application state (provider: {:?})...", config.provider);
        let (embedder, chat_model) = providers::from_config(&config)?;
        tracing::info!(
            "Providers initialized (embedding: {}, chat: {})",
            embedder.model(),
            chat_model.model()
        );
        Self::with_providers(config, embedder, chat_model)
    }

    /// Create state around existing providers
    pub fn with_providers(
        config: ChatConfig,
        embedder: Arc<dyn Embedder>,
        chat_model: Arc<dyn ChatModel>,
    ) -> Result<Self> {
        let pipeline = Arc::new(IngestPipeline::from_config(&config.chunking)?);
        let sessions = SessionStore::new(config.memory.max_messages);

        let state = Self {
            inner: Arc::new(AppStateInner {
                config,
                embedder,
                chat_model,
                pipeline,
                sessions,
                ready: RwLock::new(false),
            }),
        };
        state.set_ready(true);
        Ok(state)
    }

    /// Get configuration
    pub fn config(&self) -> &ChatConfig {
        &self.inner.config
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.inner.embedder
    }

    pub fn chat_model(&self) -> &Arc<dyn ChatModel> {
        &self.inner.chat_model
    }

    pub fn pipeline(&self) -> &Arc<IngestPipeline> {
        &self.inner.pipeline
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Check if ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
