//! Configuration for the PDF chat service
//!
//! Values come from [`ChatConfig::default`], optionally overridden by a TOML
//! file and then by environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "PDF_CHAT_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "pdf-chat.toml";

/// Environment variable holding the OpenAI credential
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Which provider backs embeddings and chat
    pub provider: ProviderKind,
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Shared LLM request settings
    pub llm: LlmConfig,
    /// OpenAI provider settings
    pub openai: OpenAiConfig,
    /// Ollama provider settings
    pub ollama: OllamaConfig,
    /// Retrieval settings
    pub retrieval: RetrievalConfig,
    /// Conversation memory settings
    pub memory: MemoryConfig,
    /// Session lifecycle settings
    pub session: SessionConfig,
}

/// Backend provider selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI HTTP API (needs `OPENAI_API_KEY`)
    #[default]
    OpenAi,
    /// Local Ollama server
    Ollama,
}

impl std::str::FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::Config(format!("Unknown provider: {}", other))),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            enable_cors: false,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Preferred break point inside a chunk window
    pub separator: String,
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            separator: "\n".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Settings shared by every provider request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for transient failures
    pub max_retries: u32,
    /// Texts per embedding request
    pub embed_batch_size: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 2,
            embed_batch_size: 64,
        }
    }
}

/// OpenAI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Chat model name
    pub chat_model: String,
    /// API key; normally filled from `OPENAI_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            embed_model: "text-embedding-3-small".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            api_key: None,
        }
    }
}

/// Ollama configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Chat model name
    pub chat_model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            chat_model: "llama3.2:3b".to_string(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the model per question
    pub top_k: usize,
    /// Drop matches below this cosine similarity
    pub min_similarity: Option<f32>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            min_similarity: None,
        }
    }
}

/// Conversation memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Maximum messages kept per session (user and assistant combined)
    pub max_messages: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { max_messages: 20 }
    }
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions idle longer than this are discarded
    pub idle_timeout_secs: u64,
    /// How often the idle sweep runs
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            sweep_interval_secs: 60,
        }
    }
}

impl ChatConfig {
    /// Load configuration from the file named by `PDF_CHAT_CONFIG` (or
    /// `pdf-chat.toml` when it exists), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse TOML text; missing sections and fields take their defaults
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("PDF_CHAT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PDF_CHAT_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid PDF_CHAT_PORT '{}': {}", port, e)))?;
        }
        if let Some(provider) = lookup("PDF_CHAT_PROVIDER") {
            self.provider = provider.parse()?;
        }
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            self.ollama.base_url = url;
        }
        // Absence is tolerated here; OpenAI calls fail when they are made.
        if let Some(key) = lookup(OPENAI_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.openai.api_key = Some(key);
        }
        Ok(())
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let chunking = &self.chunking;
        if chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be positive".to_string()));
        }
        if chunking.chunk_overlap >= chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunking.chunk_overlap, chunking.chunk_size
            )));
        }
        if chunking.separator.is_empty() {
            return Err(Error::Config("chunking.separator must not be empty".to_string()));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be positive".to_string()));
        }
        if self.memory.max_messages < 2 {
            return Err(Error::Config(
                "memory.max_messages must hold at least one exchange (2)".to_string(),
            ));
        }
        if self.llm.embed_batch_size == 0 {
            return Err(Error::Config("llm.embed_batch_size must be positive".to_string()));
        }
        Ok(())
    }

    /// Socket address string for the HTTP server
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Embedding model name for the selected provider
    pub fn embed_model(&self) -> &str {
        match self.provider {
            ProviderKind::OpenAi => &self.openai.embed_model,
            ProviderKind::Ollama => &self.ollama.embed_model,
        }
    }

    /// Chat model name for the selected provider
    pub fn chat_model(&self) -> &str {
        match self.provider {
            ProviderKind::OpenAi => &self.openai.chat_model,
            ProviderKind::Ollama => &self.ollama.chat_model,
        }
    }
}
