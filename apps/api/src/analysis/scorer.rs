//! Scorer — five-criterion rubric scoring via the gateway.
//!
//! Never fails: malformed payloads, missing fields, and transport errors all
//! collapse to the neutral all-5 result. Explanations are returned alongside
//! the scores rather than held as scorer state, so one scorer serves any
//! number of concurrent analyses.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::analysis::prompts::{scoring_user_prompt, SCORING_SYSTEM};
use crate::extract::text::{truncate_chars, MAX_PROMPT_CHARS};
use crate::llm_client::{complete_json, Gateway, LlmError, TEMP_DETERMINISTIC};
use crate::models::analysis::ScoreResult;

/// Scores plus the model's per-criterion explanations.
#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    pub scores: ScoreResult,
    pub explanations: BTreeMap<String, String>,
}

impl ScoreOutcome {
    fn neutral() -> Self {
        Self {
            scores: ScoreResult::neutral(),
            explanations: BTreeMap::new(),
        }
    }
}

/// Raw scoring payload as the model returns it. Fields are floats on
/// purpose — the model may send 7.6 — and a missing field scores neutral.
#[derive(Debug, Deserialize)]
struct RawScorePayload {
    #[serde(default = "neutral_score")]
    clarity: f64,
    #[serde(default = "neutral_score")]
    impact: f64,
    #[serde(default = "neutral_score")]
    relevance: f64,
    #[serde(default = "neutral_score")]
    completeness: f64,
    #[serde(default = "neutral_score")]
    ats_score: f64,
    #[serde(default)]
    score_explanations: BTreeMap<String, String>,
}

fn neutral_score() -> f64 {
    5.0
}

/// Scores cleaned resume text on the five rubric criteria.
pub async fn score(text: &str, gateway: &dyn Gateway) -> ScoreOutcome {
    let user = scoring_user_prompt(&truncate_chars(text, MAX_PROMPT_CHARS));
    let result =
        complete_json::<RawScorePayload>(gateway, SCORING_SYSTEM, &user, TEMP_DETERMINISTIC).await;
    outcome_from(result)
}

fn outcome_from(result: Result<RawScorePayload, LlmError>) -> ScoreOutcome {
    match result {
        Ok(raw) => ScoreOutcome {
            scores: ScoreResult {
                clarity: clamp_score(raw.clarity),
                impact: clamp_score(raw.impact),
                relevance: clamp_score(raw.relevance),
                completeness: clamp_score(raw.completeness),
                ats_score: clamp_score(raw.ats_score),
            },
            explanations: raw.score_explanations,
        },
        Err(e) => {
            tracing::warn!("Scoring failed, using neutral scores: {e}");
            ScoreOutcome::neutral()
        }
    }
}

/// Coerces whatever number the model returned into the valid score range.
/// Out-of-range and fractional values are clamped and rounded, never
/// rejected.
fn clamp_score(value: f64) -> u8 {
    value.round().clamp(1.0, 10.0) as u8
}

/// Criteria sorted ascending by score — weakest areas first. Ties keep
/// declaration order (clarity, impact, relevance, completeness, ats_score).
pub fn improvement_priority(scores: &ScoreResult) -> Vec<&'static str> {
    let mut criteria = scores.by_criterion().to_vec();
    criteria.sort_by_key(|(_, score)| *score);
    criteria.into_iter().map(|(name, _)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::tests::{FailingGateway, StaticGateway};

    #[test]
    fn test_clamp_score_out_of_range() {
        assert_eq!(clamp_score(12.0), 10);
        assert_eq!(clamp_score(-3.0), 1);
        assert_eq!(clamp_score(0.0), 1);
        assert_eq!(clamp_score(7.6), 8);
        assert_eq!(clamp_score(7.4), 7);
        assert_eq!(clamp_score(5.0), 5);
    }

    #[tokio::test]
    async fn test_score_clamps_model_output() {
        let gw = StaticGateway(
            r#"{"clarity": 12, "impact": -3, "relevance": 7.6, "completeness": 5, "ats_score": 5}"#
                .to_string(),
        );
        let outcome = score("resume text", &gw).await;
        assert_eq!(outcome.scores.clarity, 10);
        assert_eq!(outcome.scores.impact, 1);
        assert_eq!(outcome.scores.relevance, 8);
        assert_eq!(outcome.scores.completeness, 5);
        assert_eq!(outcome.scores.ats_score, 5);
        assert_eq!(outcome.scores.overall(), 5.6);
        assert_eq!(outcome.scores.grade(), "D");
    }

    #[tokio::test]
    async fn test_score_missing_fields_default_neutral() {
        let gw = StaticGateway(r#"{"clarity": 9}"#.to_string());
        let outcome = score("resume text", &gw).await;
        assert_eq!(outcome.scores.clarity, 9);
        assert_eq!(outcome.scores.impact, 5);
        assert_eq!(outcome.scores.ats_score, 5);
    }

    #[tokio::test]
    async fn test_score_gateway_failure_is_neutral() {
        let outcome = score("resume text", &FailingGateway).await;
        assert_eq!(outcome.scores, ScoreResult::neutral());
        assert!(outcome.explanations.is_empty());
        assert_eq!(outcome.scores.overall(), 5.0);
        assert_eq!(outcome.scores.grade(), "D");
    }

    #[tokio::test]
    async fn test_score_garbage_payload_is_neutral() {
        let gw = StaticGateway("I refuse to answer in JSON".to_string());
        let outcome = score("resume text", &gw).await;
        assert_eq!(outcome.scores, ScoreResult::neutral());
    }

    #[tokio::test]
    async fn test_score_keeps_explanations() {
        let gw = StaticGateway(
            r#"{"clarity": 8, "impact": 6, "relevance": 7, "completeness": 7, "ats_score": 9,
                "score_explanations": {"clarity": "reads well", "impact": "few metrics"}}"#
                .to_string(),
        );
        let outcome = score("resume text", &gw).await;
        assert_eq!(outcome.explanations.len(), 2);
        assert_eq!(outcome.explanations["impact"], "few metrics");
    }

    #[test]
    fn test_improvement_priority_ascending() {
        let scores = ScoreResult {
            clarity: 8,
            impact: 3,
            relevance: 6,
            completeness: 10,
            ats_score: 1,
        };
        assert_eq!(
            improvement_priority(&scores),
            vec!["ats_score", "impact", "relevance", "clarity", "completeness"]
        );
    }

    #[test]
    fn test_improvement_priority_ties_keep_declaration_order() {
        let scores = ScoreResult::neutral();
        assert_eq!(
            improvement_priority(&scores),
            vec!["clarity", "impact", "relevance", "completeness", "ats_score"]
        );
    }
}
