//! Score Blender: deterministic combination of the two signals.
//!
//! final = round(0.4 × similarity_pct + 0.6 × rubric_score), clamped to 0..=100.
//! Rounding is to nearest with ties away from zero (`f64::round`); on the clamped
//! non-negative range that is plain round-half-up.

use serde::Serialize;

pub const SIMILARITY_WEIGHT: f64 = 0.4;
pub const RUBRIC_WEIGHT: f64 = 0.6;

/// Blends similarity (0..=1) and rubric score (0..=100) into the final integer score.
pub fn blend(similarity: f64, rubric_score: i64) -> u8 {
    exact_blend(similarity, rubric_score).round() as u8
}

/// Similarity as a percentage rounded to one decimal place.
pub fn similarity_pct(similarity: f64) -> f64 {
    round_one_decimal(clamp_unit(similarity) * 100.0)
}

/// Unrounded blend, clamped to [0, 100].
fn exact_blend(similarity: f64, rubric_score: i64) -> f64 {
    let sim_pct = clamp_unit(similarity) * 100.0;
    let rubric = (rubric_score as f64).clamp(0.0, 100.0);
    (SIMILARITY_WEIGHT * sim_pct + RUBRIC_WEIGHT * rubric).clamp(0.0, 100.0)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Human-facing explanation of how the final score was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub similarity_weight: f64,
    pub rubric_weight: f64,
    pub similarity_pct: f64,
    pub rubric_score: u8,
    /// Blend to one decimal, before integer rounding.
    pub blended_score: f64,
    pub formula: String,
}

impl ScoreBreakdown {
    /// Built from the already-rounded percentage shown to the user, so the formula
    /// line is reproducible from the numbers next to it.
    pub fn new(similarity_pct: f64, rubric_score: u8) -> Self {
        let blended_score = round_one_decimal(
            SIMILARITY_WEIGHT * similarity_pct + RUBRIC_WEIGHT * f64::from(rubric_score),
        );
        Self {
            similarity_weight: SIMILARITY_WEIGHT,
            rubric_weight: RUBRIC_WEIGHT,
            similarity_pct,
            rubric_score,
            blended_score,
            formula: format!(
                "({SIMILARITY_WEIGHT} × {similarity_pct}) + ({RUBRIC_WEIGHT} × {rubric_score}) = {blended_score}"
            ),
        }
    }
}
