// LLM prompts for the rubric evaluation.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::evaluation::roles::Role;
use crate::llm_client::prompts::{truncate_chars, JSON_ONLY_INSTRUCTION};

/// System prompt: scopes the evaluator to one role and demands JSON-only output.
pub fn rubric_system_prompt(role: Role) -> String {
    format!(
        "You are a precise evaluator for hiring.\n\
         You only evaluate for the role: {role}.\n\
         Be strict, transparent, and actionable. {JSON_ONLY_INSTRUCTION}"
    )
}

/// User prompt: both documents (each cut to `max_chars` characters) plus the target schema.
pub fn rubric_user_prompt(role: Role, jd_text: &str, resume_text: &str, max_chars: usize) -> String {
    let jd = truncate_chars(jd_text, max_chars);
    let resume = truncate_chars(resume_text, max_chars);

    format!(
        r#"Evaluate candidate RESUME against JOB DESCRIPTION for role "{role}".

JOB DESCRIPTION:
"""{jd}"""

RESUME:
"""{resume}"""

Return JSON with this schema:
{{
  "role": "{role}",
  "rubric_score_0_to_100": <integer>,
  "summary": "<2-3 sentence overview of fit>",
  "strengths": ["..."],
  "gaps": ["..."],
  "must_have_keywords_missing": ["..."],
  "recommended_bullet_improvements": [
    {{
      "current": "<quoted line from resume, or 'N/A'>",
      "improved": "<rewrite that is quantified, impact-centered, and JD-aligned>"
    }}
  ],
  "priority_actions_in_next_48h": ["<concise tasks>"]
}}
Rules:
- Keep "rubric_score_0_to_100" an integer.
- If resume is generic or role-mismatched, reflect that in gaps and lower score.
- Prefer measurable outcomes.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_names_role_and_demands_json() {
        let system = rubric_system_prompt(Role::DataAnalyst);
        assert!(system.contains("You only evaluate for the role: Data Analyst."));
        assert!(system.contains("VALID JSON only"));
    }

    #[test]
    fn test_user_prompt_lists_every_schema_field() {
        let prompt = rubric_user_prompt(Role::DataEngineer, "jd", "resume", 100);
        for field in [
            "\"role\": \"Data Engineer\"",
            "rubric_score_0_to_100",
            "summary",
            "strengths",
            "gaps",
            "must_have_keywords_missing",
            "recommended_bullet_improvements",
            "priority_actions_in_next_48h",
        ] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("role-mismatched"));
    }

    #[test]
    fn test_user_prompt_truncates_each_document() {
        let jd = "J".repeat(50);
        let resume = "R".repeat(50);
        let prompt = rubric_user_prompt(Role::DataEngineer, &jd, &resume, 20);
        assert!(prompt.contains(&format!("\"\"\"{}\"\"\"", "J".repeat(20))));
        assert!(prompt.contains(&format!("\"\"\"{}\"\"\"", "R".repeat(20))));
        assert!(!prompt.contains(&"J".repeat(21)));
    }
}
