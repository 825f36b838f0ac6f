//! Report Assembler — pure string formatting over a finished
//! `AnalysisResult`. No gateway, no failure modes: anything missing renders
//! as an explicit placeholder line, never as blank output.
//!
//! The plain-text report is the canonical export for copy/download; the
//! markdown views back the interactive display. Tests assert field
//! presence, not byte-for-byte layout.

use chrono::Utc;
use serde::Serialize;

use crate::analysis::scorer::improvement_priority;
use crate::models::analysis::{AnalysisResult, RewriteSuggestion, SectionFeedback};

const WIDE_RULE: &str = "============================================================";
const THIN_RULE: &str = "----------------------------------------";
const SCORE_BAR_LENGTH: usize = 20;

pub const NO_REWRITES_MESSAGE: &str =
    "No bullet points found to improve. Try adding more content to your experience section.";
const NO_FEEDBACK_MESSAGE: &str = "No section feedback available.";
const NO_SUMMARY_MESSAGE: &str = "No overview available.";

/// The five renderings of one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedReport {
    pub summary: String,
    pub scores: String,
    pub feedback: String,
    pub rewrites: String,
    pub plain_text: String,
}

pub fn render(result: &AnalysisResult) -> RenderedReport {
    RenderedReport {
        summary: display_summary(result),
        scores: scores_view(result),
        feedback: feedback_view(&result.section_feedback),
        rewrites: rewrites_view(&result.rewrite_suggestions),
        plain_text: plain_text_report(result),
    }
}

/// Markdown header block shown above the result tabs.
fn display_summary(result: &AnalysisResult) -> String {
    let overview = if result.overall_summary.is_empty() {
        NO_SUMMARY_MESSAGE
    } else {
        &result.overall_summary
    };

    format!(
        "## Resume Analysis Complete\n\n\
        **File:** {}\n\
        **Word Count:** {} words\n\
        **Sections Detected:** {}\n\n\
        ---\n\n\
        ### Overview\n\n\
        {}\n\n\
        ---\n\n\
        **Overall Grade: {}** ({}/10)",
        result.document.file_name,
        result.document.word_count,
        result.document.sections.len(),
        overview,
        result.scores.grade(),
        result.scores.overall(),
    )
}

/// Markdown score breakdown with visual bars and, when present, the model's
/// per-criterion explanations and the weakest-first priority list.
fn scores_view(result: &AnalysisResult) -> String {
    let scores = &result.scores;
    let mut lines = vec![
        format!(
            "**Overall Score: {}/10** ({})",
            scores.overall(),
            scores.grade()
        ),
        String::new(),
        "**Breakdown:**".to_string(),
    ];

    for (name, value) in scores.by_criterion() {
        lines.push(format!(
            "{}: {}",
            criterion_display_name(name),
            score_bar(value)
        ));
    }

    if !result.score_explanations.is_empty() {
        lines.push(String::new());
        lines.push("**Score Details:**".to_string());
        for (criterion, explanation) in &result.score_explanations {
            lines.push(format!(
                "- **{}**: {explanation}",
                criterion_display_name(criterion)
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "**Focus first on:** {}",
        improvement_priority(scores)
            .iter()
            .take(2)
            .map(|c| criterion_display_name(c))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    lines.join("\n")
}

/// Markdown section-by-section feedback.
fn feedback_view(feedback: &[SectionFeedback]) -> String {
    if feedback.is_empty() {
        return NO_FEEDBACK_MESSAGE.to_string();
    }

    let mut lines = vec!["## Section-by-Section Feedback".to_string(), String::new()];
    for fb in feedback {
        lines.push(format!("### {}", title_case(&fb.section_name)));
        if !fb.content_found {
            lines.push("*Section not found in resume.*".to_string());
        }
        if !fb.strengths.is_empty() {
            lines.push("\n**Strengths:**".to_string());
            for s in &fb.strengths {
                lines.push(format!("- {s}"));
            }
        }
        if !fb.improvements.is_empty() {
            lines.push("\n**Areas for Improvement:**".to_string());
            for i in &fb.improvements {
                lines.push(format!("- {i}"));
            }
        }
        if !fb.missing_elements.is_empty() {
            lines.push("\n**Consider Adding:**".to_string());
            for m in &fb.missing_elements {
                lines.push(format!("- {m}"));
            }
        }
        lines.push("\n---\n".to_string());
    }
    lines.join("\n")
}

/// Markdown rewrite suggestions. An empty list renders the explicit
/// "nothing to improve" message, never a blank panel.
fn rewrites_view(suggestions: &[RewriteSuggestion]) -> String {
    if suggestions.is_empty() {
        return NO_REWRITES_MESSAGE.to_string();
    }

    let mut lines = vec!["## Improved Bullet Points".to_string(), String::new()];
    for (i, suggestion) in suggestions.iter().enumerate() {
        lines.push(format!("### {}. Improvement", i + 1));
        lines.push(String::new());
        lines.push("**Original:**".to_string());
        lines.push(format!("> {}", suggestion.original));
        lines.push(String::new());
        lines.push("**Improved:**".to_string());
        lines.push(format!("> {}", suggestion.improved));
        lines.push(String::new());
        lines.push(format!("*{}*", suggestion.explanation));
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

/// The canonical, self-contained plain-text report: every score, every
/// section's feedback, every rewrite with its explanation, in result order.
fn plain_text_report(result: &AnalysisResult) -> String {
    let scores = &result.scores;
    let mut lines = vec![
        WIDE_RULE.to_string(),
        "RESUME ANALYSIS REPORT".to_string(),
        WIDE_RULE.to_string(),
        String::new(),
        format!("File: {}", result.document.file_name),
        format!("Word Count: {}", result.document.word_count),
        format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M UTC")),
        String::new(),
        THIN_RULE.to_string(),
        "SCORES".to_string(),
        THIN_RULE.to_string(),
        format!("  Overall: {}/10 ({})", scores.overall(), scores.grade()),
    ];

    for (name, value) in scores.by_criterion() {
        lines.push(format!(
            "  - {:<13} {value}/10",
            format!("{}:", criterion_display_name(name))
        ));
    }
    for (criterion, explanation) in &result.score_explanations {
        lines.push(format!(
            "    {}: {explanation}",
            criterion_display_name(criterion)
        ));
    }

    lines.push(String::new());
    lines.push(THIN_RULE.to_string());
    lines.push("SUMMARY".to_string());
    lines.push(THIN_RULE.to_string());
    lines.push(if result.overall_summary.is_empty() {
        NO_SUMMARY_MESSAGE.to_string()
    } else {
        result.overall_summary.clone()
    });

    lines.push(String::new());
    lines.push(THIN_RULE.to_string());
    lines.push("SECTION FEEDBACK".to_string());
    lines.push(THIN_RULE.to_string());
    if result.section_feedback.is_empty() {
        lines.push(NO_FEEDBACK_MESSAGE.to_string());
    }
    for fb in &result.section_feedback {
        lines.push(String::new());
        lines.push(format!("> {}", fb.section_name.to_uppercase()));
        if !fb.strengths.is_empty() {
            lines.push("  Strengths:".to_string());
            for s in &fb.strengths {
                lines.push(format!("     - {s}"));
            }
        }
        if !fb.improvements.is_empty() {
            lines.push("  Improvements:".to_string());
            for i in &fb.improvements {
                lines.push(format!("     - {i}"));
            }
        }
        if !fb.missing_elements.is_empty() {
            lines.push("  Missing:".to_string());
            for m in &fb.missing_elements {
                lines.push(format!("     - {m}"));
            }
        }
    }

    lines.push(String::new());
    lines.push(THIN_RULE.to_string());
    lines.push("REWRITE SUGGESTIONS".to_string());
    lines.push(THIN_RULE.to_string());
    if result.rewrite_suggestions.is_empty() {
        lines.push(NO_REWRITES_MESSAGE.to_string());
    }
    for (i, rw) in result.rewrite_suggestions.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. Original:", i + 1));
        lines.push(format!("   \"{}\"", rw.original));
        lines.push("   Improved:".to_string());
        lines.push(format!("   \"{}\"", rw.improved));
        lines.push(format!("   Why: {}", rw.explanation));
    }

    lines.push(String::new());
    lines.push(WIDE_RULE.to_string());
    lines.join("\n")
}

/// `[████████░░░░░░░░░░░░] 4/10`
fn score_bar(score: u8) -> String {
    let filled = usize::from(score) * SCORE_BAR_LENGTH / 10;
    let bar: String = "█".repeat(filled) + &"░".repeat(SCORE_BAR_LENGTH - filled);
    format!("[{bar}] {score}/10")
}

fn criterion_display_name(name: &str) -> String {
    if name == "ats_score" {
        return "ATS Score".to_string();
    }
    title_case(name)
}

fn title_case(name: &str) -> String {
    name.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
