//! OpenAI API client for embeddings and chat completions

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{ChatConfig, OPENAI_API_KEY_ENV};
use crate::error::{Error, Result};
use crate::types::ChatMessage;

use super::retry::{retry_request, Attempt};

/// OpenAI HTTP client with automatic retry
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    embed_model: String,
    chat_model: String,
    temperature: f32,
    max_retries: u32,
}

#[derive(Clone, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Clone, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Clone, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client. A missing API key is reported when a call is made.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            base_url: config.openai.base_url.trim_end_matches('/').to_string(),
            api_key: config.openai.api_key.clone(),
            embed_model: config.openai.embed_model.clone(),
            chat_model: config.openai.chat_model.clone(),
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

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::MissingCredential(format!("{} is not set", OPENAI_API_KEY_ENV)))
    }

    /// Check that a key is configured and the API answers
    pub async fn health_check(&self) -> Result<bool> {
        let Ok(key) = self.api_key() else {
            return Ok(false);
        };

        match self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Embed a batch of texts; vectors are returned in input order
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let key = self.api_key()?;
        let url = format!("{}/embeddings", self.base_url);

        let request = EmbeddingRequest {
            model: self.embed_model.clone(),
            input: texts.to_vec(),
        };
        let key = key.to_string();
        let client = self.client.clone();

        let vectors = retry_request(self.max_retries, "OpenAI embedding request", || {
            let url = url.clone();
            let key = key.clone();
            let request = request.clone();
            let client = client.clone();

            async move {
                let response = match client.post(&url).bearer_auth(&key).json(&request).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        return Attempt::Transient(Error::embedding(format!("Request failed: {}", e)))
                    }
                };

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Attempt::from_status(
                        status,
                        Error::embedding(format!("HTTP {} - {}", status, body)),
                    );
                }

                match response.json::<EmbeddingResponse>().await {
                    Ok(mut parsed) => {
                        parsed.data.sort_by_key(|d| d.index);
                        Attempt::Success(parsed.data.into_iter().map(|d| d.embedding).collect::<Vec<_>>())
                    }
                    Err(e) => Attempt::Fatal(Error::embedding(format!(
                        "Failed to parse embedding response: {}",
                        e
                    ))),
                }
            }
        })
        .await?;

        if vectors.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, received {}",
                texts.len(),
                vectors.len()
            )));
        }

        Ok(vectors)
    }

    /// Run a chat completion and return the assistant text
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let key = self.api_key()?;
        let url = format!("{}/chat/completions", self.base_url);

        tracing::info!("Generating answer with model: {}", self.chat_model);

        let request = CompletionRequest {
            model: self.chat_model.clone(),
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: self.temperature,
        };
        let key = key.to_string();
        let client = self.client.clone();

        retry_request(self.max_retries, "OpenAI chat request", || {
            let url = url.clone();
            let key = key.clone();
            let request = request.clone();
            let client = client.clone();

            async move {
                let response = match client.post(&url).bearer_auth(&key).json(&request).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        return Attempt::Transient(Error::llm(format!("Chat request failed: {}", e)))
                    }
                };

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Attempt::from_status(status, Error::llm(format!("HTTP {} - {}", status, body)));
                }

                match response.json::<CompletionResponse>().await {
                    Ok(parsed) => match parsed.choices.into_iter().next().and_then(|c| c.message.content) {
                        Some(content) => Attempt::Success(content),
                        None => Attempt::Fatal(Error::llm("Chat response contained no message")),
                    },
                    Err(e) => Attempt::Fatal(Error::llm(format!("Failed to parse chat response: {}", e))),
                }
            }
        })
        .await
    }
}
