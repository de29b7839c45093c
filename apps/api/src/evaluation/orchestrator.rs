//! Evaluation Orchestrator: the single entry point callers use.
//!
//! Flow: validate role → validate JD length → extract resume text → validate resume
//!       length → (similarity ∥ rubric) → blend → EvaluationResult.
//!
//! The first failure aborts the evaluation; there is no partial result. Nothing is
//! shared between evaluations, so concurrent requests cannot affect each other.

use std::sync::Arc;

use anyhow::anyhow;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::EvaluatorConfig;
use crate::errors::AppError;
use crate::evaluation::blender::{blend, similarity_pct};
use crate::evaluation::chunker::word_count;
use crate::evaluation::extractor::TextExtractor;
use crate::evaluation::roles::Role;
use crate::evaluation::rubric::{RubricAssessment, RubricEngine};
use crate::evaluation::similarity::SimilarityEngine;
use crate::llm_client::{EmbeddingBackend, ReasoningBackend};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One resume, one job description, one role.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    /// Role label as supplied by the caller; checked against `Role::ALL`.
    pub role: String,
    pub job_description_text: String,
    pub resume_document: Bytes,
}

/// The sole output of an evaluation. Owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub role: Role,
    /// Similarity × 100, clamped to [0, 100], one decimal place.
    pub similarity_pct: f64,
    pub rubric: RubricAssessment,
    pub final_score: u8,
    /// Echoed back so the caller can show exactly what was scored.
    pub job_description_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

pub struct Evaluator {
    extractor: Arc<dyn TextExtractor>,
    similarity: SimilarityEngine,
    rubric: RubricEngine,
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        embeddings: Arc<dyn EmbeddingBackend>,
        reasoning: Arc<dyn ReasoningBackend>,
        config: EvaluatorConfig,
    ) -> Self {
        Self {
            extractor,
            similarity: SimilarityEngine::new(embeddings, config.chunk_max_words),
            rubric: RubricEngine::new(reasoning, config.max_prompt_chars, config.rubric_temperature),
            config,
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Runs one evaluation.
    ///
    /// Steps:
    /// 1. role must be one of `Role::ALL`
    /// 2. job description must have at least `min_words` words
    /// 3. extract resume text (blocking pool)
    /// 4. resume text must have at least `min_words` words
    /// 5. similarity and rubric, concurrently
    /// 6. blend
    pub async fn evaluate(&self, request: EvaluationRequest) -> Result<EvaluationResult, AppError> {
        let role: Role = request.role.parse()?;

        let jd_words = word_count(&request.job_description_text);
        if jd_words < self.config.min_words {
            return Err(AppError::Validation(format!(
                "Job description text too short. Please provide at least {} words.",
                self.config.min_words
            )));
        }

        let resume_text = self.extract(request.resume_document).await?;
        let resume_words = word_count(&resume_text);
        if resume_words < self.config.min_words {
            return Err(AppError::Validation(format!(
                "Resume text too short or unreadable from PDF (found {resume_words} words, need at least {}).",
                self.config.min_words
            )));
        }

        let request_id = Uuid::new_v4();
        info!(
            "Evaluation {request_id} started: role={role}, jd_words={jd_words}, resume_words={resume_words}"
        );

        let jd_text = request.job_description_text.as_str();
        let (similarity, rubric) = tokio::try_join!(
            async {
                self.similarity
                    .overlap(jd_text, &resume_text)
                    .await
                    .map_err(AppError::from)
            },
            async {
                self.rubric
                    .evaluate(role, jd_text, &resume_text)
                    .await
                    .map_err(AppError::from)
            },
        )?;

        let rubric_score = rubric.assessment().rubric_score_0_to_100;
        let final_score = blend(similarity, i64::from(rubric_score));
        let similarity_pct = similarity_pct(similarity);

        info!(
            "Evaluation {request_id} finished: similarity_pct={similarity_pct}, rubric={rubric_score}, rubric_fallback={}, final={final_score}",
            rubric.is_fallback()
        );
        let rubric = rubric.into_assessment();

        Ok(EvaluationResult {
            role,
            similarity_pct,
            rubric,
            final_score,
            job_description_text: request.job_description_text,
        })
    }

    async fn extract(&self, document: Bytes) -> Result<String, AppError> {
        let extractor = Arc::clone(&self.extractor);
        let text = tokio::task::spawn_blocking(move || extractor.extract(&document))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    // pdf-extract panics on some malformed documents
                    AppError::Extraction("The uploaded document could not be parsed.".to_string())
                } else {
                    AppError::Internal(anyhow!("extraction task cancelled: {e}"))
                }
            })??;
        Ok(text)
    }
}
