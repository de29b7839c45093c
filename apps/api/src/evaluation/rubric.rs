//! Rubric Engine: qualitative assessment of resume-to-role fit from the reasoning backend.
//!
//! The backend is asked for JSON only, but its output is never trusted blindly:
//! the substring between the first `{` and the last `}` is parsed, and anything that
//! does not parse degrades into a fixed fallback assessment instead of an error.
//! Only transport-level failures (`BackendError`) escape this module.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::evaluation::prompts::{rubric_system_prompt, rubric_user_prompt};
use crate::evaluation::roles::Role;
use crate::llm_client::{BackendError, ReasoningBackend};

pub const FALLBACK_SUMMARY: &str = "Could not parse evaluator output.";
pub const FALLBACK_GAP: &str = "Parsing failure, please try again.";

/// A single suggested rewrite of a resume line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletImprovement {
    #[serde(default = "not_available")]
    pub current: String,
    #[serde(default)]
    pub improved: String,
}

fn not_available() -> String {
    "N/A".to_string()
}

/// Structured rubric output. Missing list fields default to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricAssessment {
    #[serde(default)]
    pub role: String,
    #[serde(default, deserialize_with = "score_0_to_100")]
    pub rubric_score_0_to_100: u8,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub must_have_keywords_missing: Vec<String>,
    #[serde(default)]
    pub recommended_bullet_improvements: Vec<BulletImprovement>,
    #[serde(default)]
    pub priority_actions_in_next_48h: Vec<String>,
}

impl RubricAssessment {
    /// The assessment substituted when the backend output cannot be parsed.
    pub fn fallback(role: Role) -> Self {
        Self {
            role: role.label().to_string(),
            rubric_score_0_to_100: 0,
            summary: FALLBACK_SUMMARY.to_string(),
            strengths: vec![],
            gaps: vec![FALLBACK_GAP.to_string()],
            must_have_keywords_missing: vec![],
            recommended_bullet_improvements: vec![],
            priority_actions_in_next_48h: vec![],
        }
    }
}

/// Accepts integers, floats (rounded) and numeric strings; clamps to 0..=100.
fn score_0_to_100<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let raw = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
    .ok_or_else(|| {
        <D::Error as serde::de::Error>::custom(format!("rubric score is not a number: {value}"))
    })?;

    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

/// Result of interpreting the backend's response. The fallback branch is a normal value.
#[derive(Debug, Clone, PartialEq)]
pub enum RubricOutcome {
    Parsed(RubricAssessment),
    Fallback {
        assessment: RubricAssessment,
        reason: String,
    },
}

impl RubricOutcome {
    pub fn assessment(&self) -> &RubricAssessment {
        match self {
            RubricOutcome::Parsed(a) => a,
            RubricOutcome::Fallback { assessment, .. } => assessment,
        }
    }

    pub fn into_assessment(self) -> RubricAssessment {
        match self {
            RubricOutcome::Parsed(a) => a,
            RubricOutcome::Fallback { assessment, .. } => assessment,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RubricOutcome::Fallback { .. })
    }
}

/// Interprets raw backend text as a `RubricAssessment`.
pub fn parse_rubric_response(raw: &str, role: Role) -> RubricOutcome {
    match serde_json::from_str::<RubricAssessment>(json_object_span(raw)) {
        Ok(mut assessment) => {
            if assessment.role.trim().is_empty() {
                assessment.role = role.label().to_string();
            }
            RubricOutcome::Parsed(assessment)
        }
        Err(e) => RubricOutcome::Fallback {
            assessment: RubricAssessment::fallback(role),
            reason: e.to_string(),
        },
    }
}

/// Slice from the first `{` to the last `}`, or the whole text if there is no such span.
fn json_object_span(raw: &str) -> &str {
    let raw = raw.trim();
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw,
    }
}

pub struct RubricEngine {
    backend: Arc<dyn ReasoningBackend>,
    max_prompt_chars: usize,
    temperature: f32,
}

impl RubricEngine {
    pub fn new(backend: Arc<dyn ReasoningBackend>, max_prompt_chars: usize, temperature: f32) -> Self {
        Self {
            backend,
            max_prompt_chars,
            temperature,
        }
    }

    /// One backend call, then parse-or-fallback.
    pub async fn evaluate(
        &self,
        role: Role,
        jd_text: &str,
        resume_text: &str,
    ) -> Result<RubricOutcome, BackendError> {
        let system = rubric_system_prompt(role);
        let user = rubric_user_prompt(role, jd_text, resume_text, self.max_prompt_chars);

        let raw = self.backend.complete(&system, &user, self.temperature).await?;

        let outcome = parse_rubric_response(&raw, role);
        if let RubricOutcome::Fallback { reason, .. } = &outcome {
            warn!("Rubric output could not be parsed, using fallback: {reason}");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::test_doubles::StubReasoning;

    const VALID: &str = r#"{
        "role": "Data Scientist",
        "rubric_score_0_to_100": 72,
        "summary": "Solid modelling background, light on deployment.",
        "strengths": ["scikit-learn", "A/B testing"],
        "gaps": ["No MLOps exposure"],
        "must_have_keywords_missing": ["Airflow"],
        "recommended_bullet_improvements": [
            {"current": "Built models", "improved": "Built churn model cutting attrition 12%"}
        ],
        "priority_actions_in_next_48h": ["Add a deployment project"]
    }"#;

    #[test]
    fn test_not_json_at_all_yields_exact_fallback() {
        let outcome = parse_rubric_response("not JSON at all", Role::DataScientist);
        assert!(outcome.is_fallback());
        let assessment = outcome.into_assessment();
        assert_eq!(assessment.role, "Data Scientist");
        assert_eq!(assessment.rubric_score_0_to_100, 0);
        assert_eq!(assessment.summary, "Could not parse evaluator output.");
        assert!(assessment.strengths.is_empty());
        assert_eq!(assessment.gaps, vec!["Parsing failure, please try again."]);
        assert!(assessment.must_have_keywords_missing.is_empty());
        assert!(assessment.recommended_bullet_improvements.is_empty());
        assert!(assessment.priority_actions_in_next_48h.is_empty());
    }

    #[test]
    fn test_valid_json_parses() {
        let outcome = parse_rubric_response(VALID, Role::DataScientist);
        assert!(!outcome.is_fallback());
        let a = outcome.assessment();
        assert_eq!(a.rubric_score_0_to_100, 72);
        assert_eq!(a.strengths.len(), 2);
        assert_eq!(a.recommended_bullet_improvements[0].current, "Built models");
    }

    #[test]
    fn test_surrounding_prose_is_ignored() {
        let raw = format!("Sure! Here is the evaluation:\n```json\n{VALID}\n```\nHope this helps.");
        let outcome = parse_rubric_response(&raw, Role::DataScientist);
        assert_eq!(outcome.assessment().rubric_score_0_to_100, 72);
        assert!(!outcome.is_fallback());
    }

    #[test]
    fn test_invalid_interior_falls_back() {
        let outcome = parse_rubric_response("prefix { score: seventy } suffix", Role::DataAnalyst);
        assert!(outcome.is_fallback());
        assert_eq!(outcome.assessment(), &RubricAssessment::fallback(Role::DataAnalyst));
    }

    #[test]
    fn test_missing_fields_default() {
        let outcome = parse_rubric_response(
            r#"{"rubric_score_0_to_100": 40, "recommended_bullet_improvements": [{"improved": "x"}]}"#,
            Role::DataEngineer,
        );
        let a = outcome.into_assessment();
        assert_eq!(a.role, "Data Engineer");
        assert_eq!(a.rubric_score_0_to_100, 40);
        assert!(a.gaps.is_empty());
        assert_eq!(a.recommended_bullet_improvements[0].current, "N/A");
    }

    #[test]
    fn test_score_is_rounded_and_clamped() {
        let parse = |score: &str| {
            parse_rubric_response(&format!(r#"{{"rubric_score_0_to_100": {score}}}"#), Role::DataEngineer)
                .into_assessment()
                .rubric_score_0_to_100
        };
        assert_eq!(parse("66.6"), 67);
        assert_eq!(parse("150"), 100);
        assert_eq!(parse("-5"), 0);
        assert_eq!(parse("\"55\""), 55);
    }

    #[test]
    fn test_non_numeric_score_falls_back() {
        let outcome = parse_rubric_response(r#"{"rubric_score_0_to_100": "high"}"#, Role::DataEngineer);
        assert!(outcome.is_fallback());
    }

    #[test]
    fn test_json_array_falls_back() {
        let outcome = parse_rubric_response("[1, 2, 3]", Role::DataEngineer);
        assert!(outcome.is_fallback());
    }

    #[tokio::test]
    async fn test_engine_sends_prompts_at_configured_temperature() {
        let backend = Arc::new(StubReasoning::replying(VALID));
        let engine = RubricEngine::new(backend.clone(), 12_000, 0.2);

        let outcome = engine
            .evaluate(Role::DataScientist, "the jd", "the resume")
            .await
            .unwrap();
        assert_eq!(outcome.assessment().rubric_score_0_to_100, 72);

        let (system, user, temperature) = backend.last_prompt().unwrap();
        assert!(system.contains("Data Scientist"));
        assert!(user.contains("\"\"\"the jd\"\"\""));
        assert!(user.contains("\"\"\"the resume\"\"\""));
        assert!((temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_engine_absorbs_malformed_output() {
        let engine = RubricEngine::new(Arc::new(StubReasoning::replying("oops")), 12_000, 0.2);
        let outcome = engine.evaluate(Role::DataAnalyst, "jd", "cv").await.unwrap();
        assert!(outcome.is_fallback());
    }

    #[tokio::test]
    async fn test_engine_surfaces_transport_failure() {
        let engine = RubricEngine::new(Arc::new(StubReasoning::failing()), 12_000, 0.2);
        let err = engine.evaluate(Role::DataAnalyst, "jd", "cv").await.unwrap_err();
        assert!(matches!(err, BackendError::NotConfigured));
    }
}
