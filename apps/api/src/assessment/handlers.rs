//! Axum route handlers for single-pair assessment.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::score_report::ScoreReport;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    #[serde(default)]
    pub force_refresh: bool,
}

/// POST /api/v1/ranking/assess
pub async fn handle_assess(
    State(state): State<AppState>,
    Json(request): Json<AssessRequest>,
) -> Result<Json<ScoreReport>, AppError> {
    let report = state
        .assessor
        .assess(request.candidate_id, request.job_id, request.force_refresh)
        .await?;
    Ok(Json(report))
}

/// GET /api/v1/ranking/:job_id/candidates/:candidate_id
///
/// Returns the stored report, assessing the pair first if it has none.
pub async fn handle_get_candidate_score(
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ScoreReport>, AppError> {
    let report = state.assessor.assess(candidate_id, job_id, false).await?;
    Ok(Json(report))
}
