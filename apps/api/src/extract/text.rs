//! Whitespace normalization and prompt-sizing helpers for extracted text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Rough character cap applied to resume text before it is sent to the
/// gateway (~4 chars per token).
pub const MAX_PROMPT_CHARS: usize = 15_000;

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Collapses whitespace noise left behind by PDF/DOCX extraction: every line
/// trimmed, runs of 3+ newlines collapsed to 2, runs of 2+ spaces collapsed
/// to 1, outer whitespace stripped. Total and idempotent — lines are trimmed
/// before newline runs are collapsed so a second pass finds nothing new.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let trimmed_lines = text
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    let collapsed = NEWLINE_RUNS.replace_all(&trimmed_lines, "\n\n");
    let collapsed = SPACE_RUNS.replace_all(&collapsed, " ");
    collapsed.trim().to_string()
}

/// Truncates text to roughly `max_chars` characters, preferring to cut at
/// the last sentence end or newline when that loses less than 20% of the
/// budget. Appends a visible marker when anything was dropped.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let byte_cap = match text.char_indices().nth(max_chars) {
        Some((idx, _)) => idx,
        None => return text.to_string(), // within budget
    };

    let mut kept = &text[..byte_cap];
    let cut = match (kept.rfind('.'), kept.rfind('\n')) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };
    if let Some(cut) = cut {
        // Only cut at the boundary if we're not losing too much
        if cut + 1 > byte_cap * 4 / 5 {
            kept = &kept[..=cut];
        }
    }

    format!("{kept}\n\n[Content truncated for length...]")
}

/// Rough token estimate (4 chars per token).
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_newline_runs() {
        assert_eq!(normalize("a\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_collapses_space_runs() {
        assert_eq!(normalize("a    b  c"), "a b c");
    }

    #[test]
    fn test_normalize_trims_lines_and_text() {
        assert_eq!(normalize("  a  \n   b\t\n"), "a\nb");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\n  "), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = [
            "a\n   \n   \nb",
            "  Led team   of 5\n\n\n\n\nBuilt stuff  ",
            "one\ntwo\nthree",
            "\t \n x \n\n\n y \n",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_truncate_within_budget_is_identity() {
        assert_eq!(truncate_chars("short text", 100), "short text");
    }

    #[test]
    fn test_truncate_appends_marker() {
        let long = "word ".repeat(100);
        let out = truncate_chars(&long, 50);
        assert!(out.ends_with("[Content truncated for length...]"));
        assert!(out.len() < long.len());
    }

    #[test]
    fn test_truncate_prefers_sentence_boundary() {
        let text = format!("{}. tail tail tail", "x".repeat(95));
        let out = truncate_chars(&text, 100);
        // The period sits past 80% of the budget, so the cut lands there.
        assert!(out.starts_with(&"x".repeat(95)));
        assert!(out.contains("[Content truncated"));
        assert!(!out.contains("tail"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(200);
        let out = truncate_chars(&text, 50);
        assert!(out.contains("[Content truncated"));
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens("12345678"), 2);
        assert_eq!(estimate_tokens(""), 0);
    }
}
