//! Analysis pipeline — orchestrates extraction through report-ready result.
//!
//! Flow: extract → normalize → {sections, scores, feedback} → bullets →
//! rewrite (with boilerplate-filtered fallback) → AnalysisResult.
//!
//! The three gateway-backed analysis steps are independent given the cleaned
//! text and run concurrently. Each carries its own neutral fallback, so a
//! failing step never aborts the run — the report renders whatever
//! succeeded. Rewriting alone is ordered: it depends on the outcome of
//! bullet extraction.

use tracing::{debug, info};

use crate::analysis::bullets::extract_bullets;
use crate::analysis::feedback::analyze;
use crate::analysis::rewriter::rewrite_bullets;
use crate::analysis::scorer::score;
use crate::analysis::sections::detect_sections;
use crate::errors::AppError;
use crate::extract::text::{estimate_tokens, normalize};
use crate::extract::{extract, file_type_for};
use crate::lexicon::Lexicon;
use crate::llm_client::Gateway;
use crate::models::analysis::AnalysisResult;
use crate::models::document::Document;

/// Cap on bullets sent to the rewriter in one run.
const MAX_REWRITE_BULLETS: usize = 6;
/// Cap on fallback candidate lines when no bullets were found.
const MAX_FALLBACK_LINES: usize = 5;
/// Minimum length for a fallback candidate line.
const MIN_FALLBACK_LINE_CHARS: usize = 40;

/// Substrings that mark a line as contact/education boilerplate, excluded
/// from rewrite fallback candidates.
const BOILERPLATE_MARKERS: &[&str] = &[
    "email",
    "phone",
    "@",
    "university",
    "degree",
    "bachelor",
    "master",
];

/// Section names searched for bullets when the full text has none.
const EXPERIENCE_SECTION_NAMES: &[&str] = &["experience", "work", "employment"];

/// Runs the full analysis on one upload. Halts with a clear error before any
/// gateway call when the file is unsupported, unreadable, or yields no text;
/// past that point the pipeline always completes.
pub async fn run_analysis(
    bytes: &[u8],
    file_name: &str,
    gateway: &dyn Gateway,
    lexicon: &Lexicon,
) -> Result<AnalysisResult, AppError> {
    let file_type = file_type_for(file_name)?;
    let raw_text = extract(bytes, file_type)?;
    let cleaned = normalize(&raw_text);

    if cleaned.is_empty() {
        return Err(AppError::Validation(
            "Could not extract readable text from the file. \
            Please ensure the file contains selectable text."
                .to_string(),
        ));
    }

    let mut document = Document::new(cleaned, file_name.to_string(), file_type);
    info!(
        "Analyzing '{}' ({} words)",
        document.file_name, document.word_count
    );
    debug!(
        "~{} prompt tokens before truncation",
        estimate_tokens(&document.raw_text)
    );

    // Independent given the cleaned text; run concurrently. Each resolves to
    // its own fallback on failure.
    let (sections, score_outcome, (section_feedback, overall_summary)) = tokio::join!(
        detect_sections(&document.raw_text, gateway, &lexicon.taxonomy),
        score(&document.raw_text, gateway),
        analyze(&document.raw_text, gateway),
    );
    document.sections = sections;

    let mut bullets = extract_bullets(&document.raw_text, MAX_REWRITE_BULLETS, lexicon);
    if bullets.is_empty() {
        // Retry against the experience section alone — list markers are
        // sometimes lost everywhere else during extraction.
        for section in &document.sections {
            if EXPERIENCE_SECTION_NAMES.contains(&section.name.to_lowercase().as_str()) {
                bullets = extract_bullets(&section.content, MAX_REWRITE_BULLETS, lexicon);
                break;
            }
        }
    }

    let mut rewrite_suggestions = rewrite_bullets(&bullets, gateway).await;
    if rewrite_suggestions.is_empty() {
        let candidates = fallback_candidates(&document.raw_text);
        if !candidates.is_empty() {
            info!(
                "No rewrites from primary extraction; retrying with {} raw lines",
                candidates.len()
            );
            rewrite_suggestions = rewrite_bullets(&candidates, gateway).await;
        }
    }

    info!(
        "Analysis complete: {} sections, {} feedback entries, {} rewrites, grade {}",
        document.sections.len(),
        section_feedback.len(),
        rewrite_suggestions.len(),
        score_outcome.scores.grade()
    );

    Ok(AnalysisResult {
        document,
        scores: score_outcome.scores,
        score_explanations: score_outcome.explanations,
        section_feedback,
        rewrite_suggestions,
        overall_summary,
    })
}

/// Secondary rewrite candidates: raw lines long enough to be substantive
/// that don't look like contact or education boilerplate. Best effort — an
/// empty result is valid terminal behavior and renders as "nothing to
/// improve".
fn fallback_candidates(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_FALLBACK_LINE_CHARS)
        .filter(|line| {
            let lower = line.to_lowercase();
            !BOILERPLATE_MARKERS.iter().any(|m| lower.contains(m))
        })
        .take(MAX_FALLBACK_LINES)
        .map(str::to_string)
        .collect()
}
