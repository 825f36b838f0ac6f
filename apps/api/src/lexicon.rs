//! Lexicon — the open enumerations the analysis steps match against.
//!
//! The section taxonomy and the action-verb set are data, not code: both are
//! loaded once at startup and carried in `AppState`, so either can be
//! extended without touching the matching logic. Defaults ship embedded;
//! `SECTION_TAXONOMY_FILE` and `ACTION_VERBS_FILE` may point at
//! newline-separated override files.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// One resume section category the detector may assign.
#[derive(Debug, Clone)]
pub struct SectionKind {
    pub key: String,
    /// Short description shown to the model in the detection prompt.
    pub description: String,
}

/// Fallback section name used when detection fails entirely.
pub const FULL_RESUME_SECTION: &str = "full_resume";

const DEFAULT_TAXONOMY: &[(&str, &str)] = &[
    ("contact", "name, email, phone, location, LinkedIn"),
    ("summary", "professional summary, objective, profile"),
    ("experience", "work history, employment"),
    ("education", "degrees, certifications, courses"),
    ("skills", "technical skills, soft skills, languages"),
    ("projects", "personal/professional projects"),
    ("other", "awards, publications, volunteer work, etc."),
];

const DEFAULT_ACTION_VERBS: &[&str] = &[
    "led",
    "managed",
    "developed",
    "created",
    "implemented",
    "increased",
    "decreased",
    "improved",
    "designed",
    "built",
    "achieved",
    "delivered",
    "launched",
    "established",
    "generated",
    "reduced",
    "streamlined",
    "coordinated",
    "executed",
    "analyzed",
    "spearheaded",
    "orchestrated",
    "optimized",
    "collaborated",
    "drove",
    "facilitated",
    "mentored",
    "supervised",
    "oversaw",
    "authored",
    "crafted",
    "engineered",
    "architected",
    "pioneered",
    "transformed",
    "revamped",
    "modernized",
    "automated",
    "integrated",
    "negotiated",
    "secured",
    "acquired",
    "retained",
    "resolved",
    "responsible",
    "worked",
    "assisted",
    "helped",
    "supported",
];

/// Startup-loaded matching data shared by the section detector (taxonomy)
/// and the bullet extractor (action verbs).
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub taxonomy: Vec<SectionKind>,
    pub action_verbs: HashSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            taxonomy: DEFAULT_TAXONOMY
                .iter()
                .map(|(key, description)| SectionKind {
                    key: key.to_string(),
                    description: description.to_string(),
                })
                .collect(),
            action_verbs: DEFAULT_ACTION_VERBS
                .iter()
                .map(|v| v.to_string())
                .collect(),
        }
    }
}

impl Lexicon {
    /// Loads the lexicon, applying file overrides when the env vars are set.
    pub fn from_env() -> Result<Self> {
        let mut lexicon = Lexicon::default();

        if let Ok(path) = std::env::var("SECTION_TAXONOMY_FILE") {
            lexicon.taxonomy = load_taxonomy(Path::new(&path))?;
            info!(
                "Loaded section taxonomy override: {} kinds from {path}",
                lexicon.taxonomy.len()
            );
        }
        if let Ok(path) = std::env::var("ACTION_VERBS_FILE") {
            lexicon.action_verbs = load_verbs(Path::new(&path))?;
            info!(
                "Loaded action verb override: {} verbs from {path}",
                lexicon.action_verbs.len()
            );
        }

        Ok(lexicon)
    }

    pub fn taxonomy_keys(&self) -> Vec<&str> {
        self.taxonomy.iter().map(|k| k.key.as_str()).collect()
    }
}

/// Parses one `key: description` (or bare `key`) entry per line.
/// Blank lines and `#` comments are skipped.
fn load_taxonomy(path: &Path) -> Result<Vec<SectionKind>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read taxonomy file '{}'", path.display()))?;
    let kinds: Vec<SectionKind> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|line| match line.split_once(':') {
            Some((key, description)) => SectionKind {
                key: key.trim().to_lowercase(),
                description: description.trim().to_string(),
            },
            None => SectionKind {
                key: line.to_lowercase(),
                description: String::new(),
            },
        })
        .collect();

    anyhow::ensure!(
        !kinds.is_empty(),
        "Taxonomy file '{}' contains no entries",
        path.display()
    );
    Ok(kinds)
}

/// One verb per line, lowercased. Blank lines and `#` comments are skipped.
fn load_verbs(path: &Path) -> Result<HashSet<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read action verb file '{}'", path.display()))?;
    let verbs: HashSet<String> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_lowercase)
        .collect();

    anyhow::ensure!(
        !verbs.is_empty(),
        "Action verb file '{}' contains no entries",
        path.display()
    );
    Ok(verbs)
}
