//! Bullet Extractor — deterministic, regex-driven scan for improvable line
//! items. No gateway involvement.
//!
//! Pass 1 matches explicit list markers (bullet glyphs, `1.`, `a)`).
//! Pass 2 only runs when pass 1 finds nothing and falls back to lines that
//! open with a known action verb.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::Lexicon;

/// Minimum captured length for a pass-1 bullet; filters stray fragments.
const MIN_BULLET_CHARS: usize = 20;
/// Minimum line length for a pass-2 action-verb line.
const MIN_VERB_LINE_CHARS: usize = 25;

static BULLET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Actual bullet characters
        Regex::new(r"^[•\-*→►●○◦▪▸]\s*(.+)$").unwrap(),
        // Numbered lists
        Regex::new(r"^\d+\.\s*(.+)$").unwrap(),
        // Lettered lists
        Regex::new(r"^[a-z]\)\s*(.+)$").unwrap(),
    ]
});

/// Extracts up to `max_bullets` candidate bullet lines, top to bottom.
pub fn extract_bullets(text: &str, max_bullets: usize, lexicon: &Lexicon) -> Vec<String> {
    let mut bullets = Vec::new();

    for line in text.split('\n') {
        if bullets.len() >= max_bullets {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        for pattern in BULLET_PATTERNS.iter() {
            if let Some(captures) = pattern.captures(line) {
                let bullet_text = captures[1].trim();
                if bullet_text.chars().count() > MIN_BULLET_CHARS {
                    bullets.push(bullet_text.to_string());
                }
                break;
            }
        }
    }

    if !bullets.is_empty() {
        return bullets;
    }

    // No marked-up bullets anywhere; fall back to lines that read like
    // achievements.
    for line in text.split('\n') {
        if bullets.len() >= max_bullets {
            break;
        }
        let line = line.trim();
        if starts_with_action_verb(line, lexicon) && line.chars().count() > MIN_VERB_LINE_CHARS {
            bullets.push(line.to_string());
        }
    }

    bullets
}

/// True when the first word — compared lowercased, both as-is and with a
/// trailing "ed" stripped — is a known action verb.
fn starts_with_action_verb(line: &str, lexicon: &Lexicon) -> bool {
    let Some(first_word) = line.split_whitespace().next() else {
        return false;
    };
    let first_word = first_word.to_lowercase();
    if lexicon.action_verbs.contains(&first_word) {
        return true;
    }
    first_word
        .strip_suffix("ed")
        .is_some_and(|stem| lexicon.action_verbs.contains(stem))
}
