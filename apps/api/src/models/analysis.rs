use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::document::Document;

/// Criterion weights for the overall score. Declaration order here is also
/// the tie-break order for improvement prioritization.
pub const CRITERIA_WEIGHTS: [(&str, f64); 5] = [
    ("clarity", 0.20),
    ("impact", 0.25),
    ("relevance", 0.20),
    ("completeness", 0.15),
    ("ats_score", 0.20),
];

/// Multi-criteria scoring result. Every field is clamped into [1, 10] at
/// ingestion; `overall` and `grade` are always derived from the five stored
/// scores, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub clarity: u8,
    pub impact: u8,
    pub relevance: u8,
    pub completeness: u8,
    pub ats_score: u8,
}

impl ScoreResult {
    /// Neutral result substituted when the scoring call fails.
    pub fn neutral() -> Self {
        Self {
            clarity: 5,
            impact: 5,
            relevance: 5,
            completeness: 5,
            ats_score: 5,
        }
    }

    /// Criterion values in declaration order, paired with their names.
    pub fn by_criterion(&self) -> [(&'static str, u8); 5] {
        [
            ("clarity", self.clarity),
            ("impact", self.impact),
            ("relevance", self.relevance),
            ("completeness", self.completeness),
            ("ats_score", self.ats_score),
        ]
    }

    /// Weighted overall score, rounded to one decimal.
    pub fn overall(&self) -> f64 {
        let weighted = self
            .by_criterion()
            .iter()
            .zip(CRITERIA_WEIGHTS.iter())
            .map(|((_, score), (_, weight))| f64::from(*score) * weight)
            .sum::<f64>();
        (weighted * 10.0).round() / 10.0
    }

    /// Letter grade for the overall score. Thresholds are closed above:
    /// exactly 9.0 is A+, 8.9 is A.
    pub fn grade(&self) -> &'static str {
        let overall = self.overall();
        if overall >= 9.0 {
            "A+"
        } else if overall >= 8.0 {
            "A"
        } else if overall >= 7.0 {
            "B"
        } else if overall >= 6.0 {
            "C"
        } else if overall >= 5.0 {
            "D"
        } else {
            "F"
        }
    }
}

/// Feedback for one resume section. Lists are recommended to hold at most 3
/// items, but longer lists from the model are accepted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionFeedback {
    pub section_name: String,
    pub content_found: bool,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub missing_elements: Vec<String>,
}

/// A single bullet point rewrite. `improved == original` is valid when no
/// change was warranted or the rewrite call fell back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteSuggestion {
    pub original: String,
    pub improved: String,
    pub explanation: String,
}

/// Complete analysis of one upload. Built once per run, immutable, and the
/// sole input to the report assembler. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub document: Document,
    pub scores: ScoreResult,
    /// Per-criterion explanations from the scoring call (may be empty).
    pub score_explanations: BTreeMap<String, String>,
    pub section_feedback: Vec<SectionFeedback>,
    pub rewrite_suggestions: Vec<RewriteSuggestion>,
    pub overall_summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_weighted_sum() {
        // 0.20*10 + 0.25*1 + 0.20*8 + 0.15*5 + 0.20*5 = 5.6
        let scores = ScoreResult {
            clarity: 10,
            impact: 1,
            relevance: 8,
            completeness: 5,
            ats_score: 5,
        };
        assert_eq!(scores.overall(), 5.6);
        assert_eq!(scores.grade(), "D");
    }

    #[test]
    fn test_neutral_overall_is_five() {
        let scores = ScoreResult::neutral();
        assert_eq!(scores.overall(), 5.0);
        assert_eq!(scores.grade(), "D");
    }

    #[test]
    fn test_grade_boundaries_closed_above() {
        let all = |v: u8| ScoreResult {
            clarity: v,
            impact: v,
            relevance: v,
            completeness: v,
            ats_score: v,
        };
        assert_eq!(all(10).overall(), 10.0);
        assert_eq!(all(10).grade(), "A+");
        assert_eq!(all(9).grade(), "A+"); // exactly 9.0
        assert_eq!(all(8).grade(), "A");
        assert_eq!(all(7).grade(), "B");
        assert_eq!(all(6).grade(), "C");
        assert_eq!(all(5).grade(), "D");
        assert_eq!(all(4).grade(), "F");
        assert_eq!(all(1).grade(), "F");
    }

    #[test]
    fn test_grade_8_9_is_a_not_a_plus() {
        // 0.20*9 + 0.25*9 + 0.20*9 + 0.15*9 + 0.20*8 = 8.8
        let scores = ScoreResult {
            clarity: 9,
            impact: 9,
            relevance: 9,
            completeness: 9,
            ats_score: 8,
        };
        assert!(scores.overall() < 9.0);
        assert_eq!(scores.grade(), "A");
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = CRITERIA_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < f64::EPSILON);
    }
}
