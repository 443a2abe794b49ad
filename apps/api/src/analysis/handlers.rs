//! Axum route handlers for the Match API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::analysis::{AnalysisInput, NewAnalysis, StoredAnalysis};
use crate::providers::{ApiSettings, ProviderConfig};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Missing texts deserialize as empty so they fail length validation with a
/// 400 rather than a body rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub resume_text: String,
    pub api_settings: Option<ApiSettings>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    #[serde(flatten)]
    pub analysis: StoredAnalysis,
    pub fallback_used: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/match
///
/// Validates the texts and provider settings, runs the orchestrator (remote
/// provider with deterministic fallback) and stores the result.
pub async fn handle_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, AppError> {
    let Json(request) = payload?;
    let input = AnalysisInput::new(request.job_description, request.resume_text)?;
    let provider_config = request
        .api_settings
        .map(ProviderConfig::try_from)
        .transpose()?;

    let outcome = state
        .orchestrator
        .analyze(&input, provider_config.as_ref())
        .await;
    info!(
        "Match analysis complete: score={} strategy={}",
        outcome.result.match_score, outcome.strategy
    );

    let (job_description, resume_text) = input.into_parts();
    let analysis = state
        .store
        .create(NewAnalysis {
            job_description,
            resume_text,
            result: outcome.result,
        })
        .await?;

    let fallback_used = analysis.fallback_used();
    Ok(Json(MatchResponse {
        analysis,
        fallback_used,
    }))
}

/// GET /api/analysis/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<StoredAnalysis>, AppError> {
    let id: i64 = raw_id
        .parse()
        .map_err(|_| AppError::Validation("Invalid analysis ID".to_string()))?;

    let analysis = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;

    Ok(Json(analysis))
}

/// GET /api/history
///
/// Every stored analysis, newest first.
pub async fn handle_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredAnalysis>>, AppError> {
    Ok(Json(state.store.list_all().await?))
}
