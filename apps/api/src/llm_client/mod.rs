//! Backend clients: the single point of entry for all embedding and chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may talk to the model provider directly.
//! The evaluation engines only see the `EmbeddingBackend` and `ReasoningBackend` traits,
//! so tests can substitute doubles and nothing holds a process-wide client handle.
//!
//! Calls are single-shot: a failure is surfaced immediately, never retried.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ModelConfig;

pub mod prompts;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend client not configured (set OPENAI_API_KEY)")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error("backend returned empty content")]
    EmptyContent,

    #[error("backend returned {got} embeddings for {expected} inputs")]
    Mismatch { expected: usize, got: usize },
}

/// Turns text into embedding vectors, one per input and in input order.
///
/// Callers must not pass an empty slice.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, BackendError>;
}

/// Single-turn chat completion returning the raw response text.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, BackendError>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for OpenAI-compatible `/embeddings` and `/chat/completions` endpoints.
/// Implements both backend traits; cheap to clone.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    models: ModelConfig,
}

impl OpenAiClient {
    /// Builds the client. A missing `api_key` is allowed: every call then fails with
    /// `BackendError::NotConfigured`.
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        models: ModelConfig,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            models,
        })
    }

    pub fn models(&self) -> &ModelConfig {
        &self.models
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response, BackendError> {
        let api_key = self.api_key.as_deref().ok_or(BackendError::NotConfigured)?;

        let response = self
            .client
            .post(format!("{}/{path}", self.base_url))
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAiClient {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.models.embedding_model,
            input: inputs,
        };
        let response = self.post("embeddings", &request).await?;
        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        let vectors = order_embeddings(parsed.data, inputs.len())?;
        debug!(
            "Embedding call succeeded: inputs={}, model={}",
            inputs.len(),
            self.models.embedding_model
        );
        Ok(vectors)
    }
}

#[async_trait]
impl ReasoningBackend for OpenAiClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, BackendError> {
        let request = ChatRequest {
            model: &self.models.rubric_model,
            temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };
        let response = self.post("chat/completions", &request).await?;
        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(BackendError::EmptyContent)?;

        debug!(
            "Chat completion succeeded: chars={}, model={}",
            text.len(),
            self.models.rubric_model
        );
        Ok(text.trim().to_string())
    }
}

/// Restores input order (the API tags each item with `index`) and checks the count.
fn order_embeddings(
    mut data: Vec<EmbeddingData>,
    expected: usize,
) -> Result<Vec<Vec<f32>>, BackendError> {
    if data.len() != expected {
        return Err(BackendError::Mismatch {
            expected,
            got: data.len(),
        });
    }
    data.sort_by_key(|entry| entry.index);
    Ok(data.into_iter().map(|entry| entry.embedding).collect())
}
