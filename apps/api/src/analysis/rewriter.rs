//! Rewriter — batch bullet improvement via the gateway.
//!
//! All bullets go out in one request. The model may omit bullets it judges
//! already strong, so the result can be shorter than the input — callers
//! match suggestions by `original`, never by position.

use serde::Deserialize;

use crate::analysis::prompts::{rewrite_single_user_prompt, rewrite_user_prompt, REWRITE_SYSTEM};
use crate::llm_client::{complete_json, Gateway, TEMP_GENERATIVE};
use crate::models::analysis::RewriteSuggestion;

#[derive(Debug, Deserialize)]
struct RawRewritePayload {
    #[serde(default)]
    rewrites: Vec<RawRewrite>,
}

#[derive(Debug, Deserialize)]
struct RawRewrite {
    #[serde(default)]
    original: String,
    #[serde(default)]
    improved: String,
    #[serde(default)]
    explanation: String,
}

impl From<RawRewrite> for RewriteSuggestion {
    fn from(raw: RawRewrite) -> Self {
        RewriteSuggestion {
            original: raw.original,
            improved: raw.improved,
            explanation: raw.explanation,
        }
    }
}

/// Rewrites a batch of bullets. Empty input returns empty output without
/// touching the gateway; any gateway failure returns an empty list and the
/// pipeline-level fallback takes over.
pub async fn rewrite_bullets(bullets: &[String], gateway: &dyn Gateway) -> Vec<RewriteSuggestion> {
    if bullets.is_empty() {
        return Vec::new();
    }

    let user = rewrite_user_prompt(bullets);
    match complete_json::<RawRewritePayload>(gateway, REWRITE_SYSTEM, &user, TEMP_GENERATIVE).await
    {
        Ok(payload) => payload
            .rewrites
            .into_iter()
            .map(RewriteSuggestion::from)
            .collect(),
        Err(e) => {
            tracing::warn!("Bullet rewriting failed: {e}");
            Vec::new()
        }
    }
}

/// Rewrites a single piece of text, optionally tagged with what it is
/// ("summary", "bullet point"). Always returns a suggestion; on failure the
/// text comes back unchanged with the reason in the explanation.
pub async fn rewrite_single(
    text: &str,
    context: Option<&str>,
    gateway: &dyn Gateway,
) -> RewriteSuggestion {
    let user = rewrite_single_user_prompt(text, context);
    match complete_json::<RawRewritePayload>(gateway, REWRITE_SYSTEM, &user, TEMP_GENERATIVE).await
    {
        Ok(payload) => match payload.rewrites.into_iter().next() {
            Some(raw) => RewriteSuggestion {
                original: text.to_string(),
                improved: if raw.improved.is_empty() {
                    text.to_string()
                } else {
                    raw.improved
                },
                explanation: raw.explanation,
            },
            None => RewriteSuggestion {
                original: text.to_string(),
                improved: text.to_string(),
                explanation: "No changes needed".to_string(),
            },
        },
        Err(e) => RewriteSuggestion {
            original: text.to_string(),
            improved: text.to_string(),
            explanation: format!("Rewrite failed: {e}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::tests::{FailingGateway, StaticGateway};

    /// Gateway that panics if called — proves short-circuit paths.
    struct PanickingGateway;

    #[async_trait::async_trait]
    impl Gateway for PanickingGateway {
        async fn complete(
            &self,
            _: &str,
            _: &str,
            _: f32,
        ) -> Result<String, crate::llm_client::LlmError> {
            panic!("gateway must not be called for empty input");
        }
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_gateway_call() {
        let suggestions = rewrite_bullets(&[], &PanickingGateway).await;
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_rewrite_bullets_happy_path() {
        let gw = StaticGateway(
            r#"{"rewrites": [
                {"original": "helped with testing",
                 "improved": "Automated 200 regression tests, cutting QA time by 30%",
                 "explanation": "Quantifies the outcome"}
            ]}"#
            .to_string(),
        );
        let bullets = vec!["helped with testing".to_string()];
        let suggestions = rewrite_bullets(&bullets, &gw).await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].original, "helped with testing");
        assert!(suggestions[0].improved.contains("30%"));
    }

    #[tokio::test]
    async fn test_rewrite_bullets_output_may_be_shorter() {
        // Model judged the second bullet already strong and omitted it.
        let gw = StaticGateway(
            r#"{"rewrites": [{"original": "a", "improved": "b", "explanation": "c"}]}"#.to_string(),
        );
        let bullets = vec!["a".to_string(), "already great bullet".to_string()];
        let suggestions = rewrite_bullets(&bullets, &gw).await;
        assert_eq!(suggestions.len(), 1);
    }

    #[tokio::test]
    async fn test_rewrite_bullets_failure_is_empty() {
        let bullets = vec!["something".to_string()];
        let suggestions = rewrite_bullets(&bullets, &FailingGateway).await;
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_rewrite_bullets_garbage_payload_is_empty() {
        let gw = StaticGateway("no json here".to_string());
        let suggestions = rewrite_bullets(&["x".to_string()], &gw).await;
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_rewrite_single_failure_keeps_original() {
        let suggestion = rewrite_single("original text", Some("summary"), &FailingGateway).await;
        assert_eq!(suggestion.original, "original text");
        assert_eq!(suggestion.improved, "original text");
        assert!(suggestion.explanation.starts_with("Rewrite failed:"));
    }

    #[tokio::test]
    async fn test_rewrite_single_empty_rewrites_means_no_change() {
        let gw = StaticGateway(r#"{"rewrites": []}"#.to_string());
        let suggestion = rewrite_single("fine as is", None, &gw).await;
        assert_eq!(suggestion.improved, "fine as is");
        assert_eq!(suggestion.explanation, "No changes needed");
    }

    #[tokio::test]
    async fn test_rewrite_single_uses_first_rewrite() {
        let gw = StaticGateway(
            r#"{"rewrites": [{"original": "x", "improved": "much better", "explanation": "verbs"}]}"#
                .to_string(),
        );
        let suggestion = rewrite_single("x", Some("bullet point"), &gw).await;
        assert_eq!(suggestion.improved, "much better");
        assert_eq!(suggestion.explanation, "verbs");
    }
}
