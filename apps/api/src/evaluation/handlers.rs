//! Axum route handlers for the Evaluation API.

use std::collections::BTreeSet;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::evaluation::blender::ScoreBreakdown;
use crate::evaluation::chunker::word_count;
use crate::evaluation::orchestrator::{EvaluationRequest, EvaluationResult};
use crate::evaluation::roles::Role;
use crate::state::AppState;

const MISSING_INPUT: &str =
    "Please provide job description text, select a role, and upload a PDF.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<&'static str>,
    pub default: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TextStats {
    pub characters: usize,
    pub words: usize,
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    #[serde(flatten)]
    pub result: EvaluationResult,
    pub score_breakdown: ScoreBreakdown,
    pub jd_stats: TextStats,
    pub missing_keywords_sorted: Vec<String>,
}

impl From<EvaluationResult> for EvaluationResponse {
    fn from(result: EvaluationResult) -> Self {
        let score_breakdown =
            ScoreBreakdown::new(result.similarity_pct, result.rubric.rubric_score_0_to_100);
        let jd_stats = TextStats {
            characters: result.job_description_text.chars().count(),
            words: word_count(&result.job_description_text),
        };
        let missing_keywords_sorted = result
            .rubric
            .must_have_keywords_missing
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            result,
            score_breakdown,
            jd_stats,
            missing_keywords_sorted,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
pub async fn handle_list_roles() -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: Role::ALL.iter().map(|r| r.label()).collect(),
        default: Role::default().label(),
    })
}

/// POST /api/v1/evaluations
///
/// Multipart form with `role`, `jd_text` and a `resume` file part.
/// Runs one synchronous evaluation and returns the result with a score breakdown.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EvaluationResponse>, AppError> {
    let mut role: Option<String> = None;
    let mut jd_text: Option<String> = None;
    let mut resume: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "role" => role = Some(read_text(field).await?),
            "jd_text" => jd_text = Some(read_text(field).await?),
            "resume" => {
                resume = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Invalid resume upload: {e}")))?,
                )
            }
            _ => {}
        }
    }

    let role = role.filter(|r| !r.trim().is_empty());
    let jd_text = jd_text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let resume = resume.filter(|b| !b.is_empty());

    let (Some(role), Some(job_description_text), Some(resume_document)) = (role, jd_text, resume)
    else {
        return Err(AppError::Validation(MISSING_INPUT.to_string()));
    };

    let result = state
        .evaluator
        .evaluate(EvaluationRequest {
            role,
            job_description_text,
            resume_document,
        })
        .await?;

    Ok(Json(result.into()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid form field: {e}")))
}
