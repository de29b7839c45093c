//! In-process stand-ins for the backends and the extractor. Test builds only.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::evaluation::extractor::{ExtractionError, TextExtractor};
use crate::llm_client::{BackendError, EmbeddingBackend, ReasoningBackend};

type VectorFn = Box<dyn Fn(&str) -> Vec<f32> + Send + Sync>;

/// Embedding backend that maps each input's first word to a vector.
pub struct StubEmbeddings {
    vector_for: Option<VectorFn>,
    calls: AtomicUsize,
    inputs: AtomicUsize,
}

impl StubEmbeddings {
    pub fn constant(vector: Vec<f32>) -> Self {
        Self::with(Some(Box::new(move |_: &str| vector.clone())))
    }

    pub fn by_first_word(f: impl Fn(&str) -> Vec<f32> + Send + Sync + 'static) -> Self {
        Self::with(Some(Box::new(f)))
    }

    /// Every call fails as if no API key were configured.
    pub fn failing() -> Self {
        Self::with(None)
    }

    fn with(vector_for: Option<VectorFn>) -> Self {
        Self {
            vector_for,
            calls: AtomicUsize::new(0),
            inputs: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total strings embedded across all calls.
    pub fn inputs_seen(&self) -> usize {
        self.inputs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingBackend for StubEmbeddings {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        assert!(!inputs.is_empty(), "embedding backend called with no inputs");
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.fetch_add(inputs.len(), Ordering::SeqCst);

        let f = self.vector_for.as_ref().ok_or(BackendError::NotConfigured)?;
        Ok(inputs
            .iter()
            .map(|text| f(text.split_whitespace().next().unwrap_or("")))
            .collect())
    }
}

/// Reasoning backend returning a canned response and recording the prompts it saw.
pub struct StubReasoning {
    response: Option<String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<(String, String, f32)>>,
}

impl StubReasoning {
    pub fn replying(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(system, user, temperature)` of the most recent call.
    pub fn last_prompt(&self) -> Option<(String, String, f32)> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReasoningBackend for StubReasoning {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() =
            Some((system.to_string(), user.to_string(), temperature));
        self.response.clone().ok_or(BackendError::NotConfigured)
    }
}

/// Extractor that ignores its input and returns fixed text, or always fails.
pub struct StubExtractor {
    text: Option<String>,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextExtractor for StubExtractor {
    fn extract(&self, _data: &[u8]) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text
            .clone()
            .ok_or_else(|| ExtractionError::Parse("invalid file header".to_string()))
    }
}

/// `n` distinct words, enough to pass the minimum length checks.
pub fn words(prefix: &str, n: usize) -> String {
    (0..n)
        .map(|i| format!("{prefix}{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}
