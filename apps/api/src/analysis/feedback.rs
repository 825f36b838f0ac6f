//! Feedback Generator — empathetic per-section feedback via the gateway.
//!
//! The ≤3-items-per-list cap lives in the prompt only; longer lists from a
//! non-compliant model are accepted as-is. Failures produce a single
//! user-safe error entry, never a propagated exception.

use serde::Deserialize;

use crate::analysis::prompts::{analysis_user_prompt, ANALYSIS_SYSTEM, QUICK_SUMMARY_SYSTEM};
use crate::extract::text::{truncate_chars, MAX_PROMPT_CHARS};
use crate::llm_client::{complete_json, Gateway, LlmError, TEMP_GENERATIVE};
use crate::models::analysis::SectionFeedback;

const QUICK_SUMMARY_CHARS: usize = 5_000;

const FAILURE_SUMMARY: &str = "Unable to generate analysis. Please try again.";

#[derive(Debug, Deserialize)]
struct RawFeedbackPayload {
    #[serde(default)]
    overall_summary: String,
    #[serde(default)]
    sections: Vec<RawSectionFeedback>,
}

#[derive(Debug, Deserialize)]
struct RawSectionFeedback {
    #[serde(default = "unknown_section")]
    section_name: String,
    #[serde(default = "default_true")]
    content_found: bool,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    missing_elements: Vec<String>,
}

fn unknown_section() -> String {
    "Unknown".to_string()
}

fn default_true() -> bool {
    true
}

/// Generates per-section feedback and a short overall summary.
pub async fn analyze(text: &str, gateway: &dyn Gateway) -> (Vec<SectionFeedback>, String) {
    let user = analysis_user_prompt(&truncate_chars(text, MAX_PROMPT_CHARS));
    let result =
        complete_json::<RawFeedbackPayload>(gateway, ANALYSIS_SYSTEM, &user, TEMP_GENERATIVE).await;
    feedback_from(result)
}

fn feedback_from(result: Result<RawFeedbackPayload, LlmError>) -> (Vec<SectionFeedback>, String) {
    match result {
        Ok(raw) => {
            let feedback = raw
                .sections
                .into_iter()
                .map(|s| SectionFeedback {
                    section_name: s.section_name,
                    content_found: s.content_found,
                    strengths: s.strengths,
                    improvements: s.improvements,
                    missing_elements: s.missing_elements,
                })
                .collect();
            (feedback, raw.overall_summary)
        }
        Err(e) => {
            tracing::warn!("Feedback generation failed: {e}");
            (
                vec![SectionFeedback {
                    section_name: "Error".to_string(),
                    content_found: false,
                    strengths: vec![],
                    improvements: vec![format!("Analysis failed: {e}")],
                    missing_elements: vec![],
                }],
                FAILURE_SUMMARY.to_string(),
            )
        }
    }
}

/// Quick one-paragraph impression of the resume. Plain-text completion; any
/// failure is mapped to a readable message rather than an error.
pub async fn quick_summary(text: &str, gateway: &dyn Gateway) -> String {
    let user = truncate_chars(text, QUICK_SUMMARY_CHARS);
    match gateway
        .complete(QUICK_SUMMARY_SYSTEM, &user, TEMP_GENERATIVE)
        .await
    {
        Ok(summary) => summary.trim().to_string(),
        Err(e) => format!("Unable to generate summary: {e}"),
    }
}
