//! Section Detector — classifies resume text into the configured taxonomy
//! via the gateway. Never fails: on any gateway or parse error the whole
//! text becomes a single fallback section so downstream steps always have
//! at least one section to inspect.

use serde_json::{Map, Value};
use tracing::info;

use crate::analysis::prompts::section_detection_system;
use crate::extract::text::{truncate_chars, MAX_PROMPT_CHARS};
use crate::lexicon::{SectionKind, FULL_RESUME_SECTION};
use crate::llm_client::{complete_json, Gateway, TEMP_DETERMINISTIC};
use crate::models::document::Section;

/// Detects sections in cleaned resume text, in taxonomy order.
pub async fn detect_sections(
    text: &str,
    gateway: &dyn Gateway,
    taxonomy: &[SectionKind],
) -> Vec<Section> {
    let system = section_detection_system(taxonomy);
    let user = truncate_chars(text, MAX_PROMPT_CHARS);

    match complete_json::<Map<String, Value>>(gateway, &system, &user, TEMP_DETERMINISTIC).await {
        Ok(payload) => {
            let sections = sections_from_payload(&payload, taxonomy);
            info!("Detected {} sections", sections.len());
            if sections.is_empty() {
                vec![Section::new(FULL_RESUME_SECTION, text)]
            } else {
                sections
            }
        }
        Err(e) => {
            tracing::warn!("Section detection failed, using full-resume fallback: {e}");
            vec![Section::new(FULL_RESUME_SECTION, text)]
        }
    }
}

/// Builds one `Section` per taxonomy key with usable content, preserving
/// taxonomy order. JSON `null`, the literal string "null", and empty strings
/// all mean "section absent" — the model's explicit "none" and an omitted
/// key are deliberately indistinguishable here.
fn sections_from_payload(payload: &Map<String, Value>, taxonomy: &[SectionKind]) -> Vec<Section> {
    taxonomy
        .iter()
        .filter_map(|kind| {
            let content = payload.get(&kind.key)?.as_str()?;
            if content.is_empty() || content == "null" {
                return None;
            }
            Some(Section::new(kind.key.clone(), content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::llm_client::tests::{FailingGateway, StaticGateway};

    fn payload(json: &str) -> Map<String, Value> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_sections_from_payload_preserves_taxonomy_order() {
        let lexicon = Lexicon::default();
        let payload = payload(
            r#"{
                "skills": "Rust, SQL",
                "contact": "a@b.com",
                "experience": "Engineer at Acme"
            }"#,
        );
        let sections = sections_from_payload(&payload, &lexicon.taxonomy);
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["contact", "experience", "skills"]);
    }

    #[test]
    fn test_sections_from_payload_skips_null_markers() {
        let lexicon = Lexicon::default();
        let payload = payload(
            r#"{
                "contact": null,
                "summary": "null",
                "experience": "",
                "skills": "Rust",
                "projects": 42
            }"#,
        );
        let sections = sections_from_payload(&payload, &lexicon.taxonomy);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "skills");
        assert_eq!(sections[0].content, "Rust");
    }

    #[test]
    fn test_sections_from_payload_ignores_unknown_keys() {
        let lexicon = Lexicon::default();
        let payload = payload(r#"{"hobbies": "chess", "skills": "Rust"}"#);
        let sections = sections_from_payload(&payload, &lexicon.taxonomy);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "skills");
    }

    #[tokio::test]
    async fn test_detect_sections_gateway_failure_falls_back() {
        let lexicon = Lexicon::default();
        let sections = detect_sections("full text here", &FailingGateway, &lexicon.taxonomy).await;
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, FULL_RESUME_SECTION);
        assert_eq!(sections[0].content, "full text here");
    }

    #[tokio::test]
    async fn test_detect_sections_all_null_falls_back() {
        let lexicon = Lexicon::default();
        let gw = StaticGateway(r#"{"contact": null, "summary": null}"#.to_string());
        let sections = detect_sections("the text", &gw, &lexicon.taxonomy).await;
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, FULL_RESUME_SECTION);
    }

    #[tokio::test]
    async fn test_detect_sections_happy_path() {
        let lexicon = Lexicon::default();
        let gw = StaticGateway(
            r#"{"contact": "a@b.com", "experience": "Acme", "skills": null}"#.to_string(),
        );
        let sections = detect_sections("text", &gw, &lexicon.taxonomy).await;
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "contact");
        assert_eq!(sections[1].name, "experience");
    }
}
