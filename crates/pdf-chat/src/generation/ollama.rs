//! Ollama client for embeddings and chat with retry logic

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::types::ChatMessage;

use super::retry::{retry_request, Attempt};

/// Ollama API client with automatic retry
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    base_url: String,
    embed_model: String,
    chat_model: String,
    temperature: f32,
    /// Maximum retries
    max_retries: u32,
}

#[derive(Clone, Serialize)]
struct EmbedRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Clone, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Clone, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    /// Create a new Ollama client with retry support
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            base_url: config.ollama.base_url.trim_end_matches('/').to_string(),
            embed_model: config.ollama.embed_model.clone(),
            chat_model: config.ollama.chat_model.clone(),
            temperature: config.llm.temperature,
            max_retries: config.llm.max_retries,
        })
    }

    pub fn embed_model(&self) -> &str {
        &self.embed_model
    }

    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding using Ollama with retry
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbedRequest {
            model: self.embed_model.clone(),
            prompt: text.to_string(),
        };
        let client = self.client.clone();

        retry_request(self.max_retries, "Ollama embedding request", || {
            let url = url.clone();
            let request = request.clone();
            let client = client.clone();

            async move {
                let response = match client.post(&url).json(&request).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        return Attempt::Transient(Error::embedding(format!(
                            "Embedding request failed: {}",
                            e
                        )))
                    }
                };

                let status = response.status();
                if !status.is_success() {
                    return Attempt::from_status(
                        status,
                        Error::embedding(format!("Embedding failed: HTTP {}", status)),
                    );
                }

                match response.json::<EmbedResponse>().await {
                    Ok(parsed) => Attempt::Success(parsed.embedding),
                    Err(e) => Attempt::Fatal(Error::embedding(format!(
                        "Failed to parse embedding response: {}",
                        e
                    ))),
                }
            }
        })
        .await
    }

    /// Send the conversation to `/api/chat` and return the reply
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: m.content.clone(),
                })
                .collect(),
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };
        let client = self.client.clone();

        tracing::info!("Generating answer with model: {}", self.chat_model);

        retry_request(self.max_retries, "Ollama chat request", || {
            let url = url.clone();
            let request = request.clone();
            let client = client.clone();

            async move {
                let response = match client.post(&url).json(&request).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        return Attempt::Transient(Error::llm(format!("Generation request failed: {}", e)))
                    }
                };

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Attempt::from_status(
                        status,
                        Error::llm(format!("Generation failed: HTTP {} - {}", status, body)),
                    );
                }

                match response.json::<ChatResponse>().await {
                    Ok(parsed) => Attempt::Success(parsed.message.content),
                    Err(e) => Attempt::Fatal(Error::llm(format!(
                        "Failed to parse generation response: {}",
                        e
                    ))),
                }
            }
        })
        .await
    }
}
