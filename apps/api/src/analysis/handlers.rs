//! Axum route handlers for the Analysis API.

use std::collections::BTreeMap;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::feedback::quick_summary;
use crate::analysis::pipeline::run_analysis;
use crate::analysis::rewriter::rewrite_single;
use crate::analysis::scorer::improvement_priority;
use crate::errors::AppError;
use crate::extract::{file_info, FileInfo};
use crate::models::analysis::{RewriteSuggestion, ScoreResult, SectionFeedback};
use crate::report::{render, RenderedReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Scores plus their derived overall and grade, flattened for clients.
#[derive(Debug, Serialize)]
pub struct ScoresBody {
    pub clarity: u8,
    pub impact: u8,
    pub relevance: u8,
    pub completeness: u8,
    pub ats_score: u8,
    pub overall: f64,
    pub grade: String,
}

impl From<&ScoreResult> for ScoresBody {
    fn from(scores: &ScoreResult) -> Self {
        Self {
            clarity: scores.clarity,
            impact: scores.impact,
            relevance: scores.relevance,
            completeness: scores.completeness,
            ats_score: scores.ats_score,
            overall: scores.overall(),
            grade: scores.grade().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub file: FileInfo,
    pub word_count: usize,
    pub sections_detected: usize,
    pub scores: ScoresBody,
    pub score_explanations: BTreeMap<String, String>,
    pub improvement_priority: Vec<String>,
    pub section_feedback: Vec<SectionFeedback>,
    pub rewrite_suggestions: Vec<RewriteSuggestion>,
    pub overall_summary: String,
    pub report: RenderedReport,
}

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub text: String,
    pub context: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyses
///
/// Multipart upload (`file` part) → full analysis. Upload bytes live only
/// for the duration of this request.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut upload: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| AppError::Validation("Upload is missing a file name".to_string()))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            upload = Some((file_name, data));
            break;
        }
    }

    let (file_name, data) = upload.ok_or_else(|| {
        AppError::Validation("Multipart upload must include a 'file' part".to_string())
    })?;

    let result = run_analysis(&data, &file_name, state.llm.as_ref(), &state.lexicon).await?;
    let report = render(&result);

    Ok(Json(AnalyzeResponse {
        analysis_id: Uuid::new_v4(),
        file: file_info(&data, &file_name),
        word_count: result.document.word_count,
        sections_detected: result.document.sections.len(),
        scores: ScoresBody::from(&result.scores),
        improvement_priority: improvement_priority(&result.scores)
            .into_iter()
            .map(str::to_string)
            .collect(),
        score_explanations: result.score_explanations,
        section_feedback: result.section_feedback,
        rewrite_suggestions: result.rewrite_suggestions,
        overall_summary: result.overall_summary,
        report,
    }))
}

/// POST /api/v1/rewrites
///
/// Ad hoc single-text rewrite with an optional context tag
/// ("summary", "bullet point").
pub async fn handle_rewrite(
    State(state): State<AppState>,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<RewriteSuggestion>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let suggestion =
        rewrite_single(&request.text, request.context.as_deref(), state.llm.as_ref()).await;

    Ok(Json(suggestion))
}

/// POST /api/v1/summaries
///
/// Quick 2-3 sentence impression of pasted resume text.
pub async fn handle_quick_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let summary = quick_summary(&request.text, state.llm.as_ref()).await;

    Ok(Json(SummaryResponse { summary }))
}
