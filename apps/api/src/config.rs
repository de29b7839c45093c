use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_RUBRIC_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";

/// Application configuration loaded from environment variables.
///
/// Only `OPENAI_API_KEY` is meaningful without a default, and even that is optional:
/// without it the service still starts, but every backend call is reported as unavailable.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub models: ModelConfig,
    pub backend_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

/// Model identifiers for the two backends.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Chat model that produces the rubric assessment. `OPENAI_MODEL_RUBRIC`.
    pub rubric_model: String,
    /// Embedding model for similarity. `OPENAI_MODEL_EMBED`.
    pub embedding_model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            rubric_model: DEFAULT_RUBRIC_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }
}

/// Tunables for a single evaluation, handed to the `Evaluator` at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorConfig {
    /// Minimum word count for both the job description and the extracted resume.
    pub min_words: usize,
    /// Max words per chunk sent to the embedding backend.
    pub chunk_max_words: usize,
    /// Each document is cut to this many characters before it goes into the rubric prompt.
    pub max_prompt_chars: usize,
    pub rubric_temperature: f32,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            min_words: 50,
            chunk_max_words: 1200,
            max_prompt_chars: 12_000,
            rubric_temperature: 0.2,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = std::env::var("BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            models: ModelConfig {
                rubric_model: optional_env("OPENAI_MODEL_RUBRIC")
                    .unwrap_or_else(|| DEFAULT_RUBRIC_MODEL.to_string()),
                embedding_model: optional_env("OPENAI_MODEL_EMBED")
                    .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            },
            backend_timeout: Duration::from_secs(timeout_secs),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
