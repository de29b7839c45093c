//! Semantic overlap between a job description and a resume.
//!
//! Both texts are chunked and embedded; the score is a bidirectional best-match
//! aggregate over chunk pairs:
//!
//! 1. forward  = mean over JD chunks of (max cosine vs any resume chunk)
//! 2. backward = mean over resume chunks of (max cosine vs any JD chunk)
//! 3. overlap  = (forward + backward) / 2, clamped to [0, 1]
//!
//! A resume chunk that nails one JD requirement still counts, and documents of very
//! different length are not penalised the way a single whole-document cosine would be.

use std::sync::Arc;

use crate::evaluation::chunker::chunk_words;
use crate::llm_client::{BackendError, EmbeddingBackend};

pub struct SimilarityEngine {
    backend: Arc<dyn EmbeddingBackend>,
    chunk_max_words: usize,
}

impl SimilarityEngine {
    pub fn new(backend: Arc<dyn EmbeddingBackend>, chunk_max_words: usize) -> Self {
        Self {
            backend,
            chunk_max_words,
        }
    }

    /// Returns the overlap score in [0, 1]. Any backend failure aborts the computation.
    pub async fn overlap(&self, jd_text: &str, resume_text: &str) -> Result<f64, BackendError> {
        let jd_chunks = chunk_words(jd_text, self.chunk_max_words);
        let resume_chunks = chunk_words(resume_text, self.chunk_max_words);

        let (jd_vecs, resume_vecs) = tokio::try_join!(
            self.embed_chunks(&jd_chunks),
            self.embed_chunks(&resume_chunks)
        )?;

        Ok(bidirectional_best_match(&jd_vecs, &resume_vecs))
    }

    async fn embed_chunks(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }
        self.backend.embed(chunks).await
    }
}

/// Cosine similarity. Zero-norm or mismatched-length vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    dot / denom
}

/// Mean-of-max in both directions, averaged. Either side empty → 0.0.
pub fn bidirectional_best_match(left: &[Vec<f32>], right: &[Vec<f32>]) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let forward = mean_best_match(left, right);
    let backward = mean_best_match(right, left);

    ((forward + backward) / 2.0).clamp(0.0, 1.0)
}

fn mean_best_match(from: &[Vec<f32>], against: &[Vec<f32>]) -> f64 {
    let total: f64 = from
        .iter()
        .map(|a| {
            against
                .iter()
                .map(|b| cosine_similarity(a, b))
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .sum();
    total / from.len() as f64
}
